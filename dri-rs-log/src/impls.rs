use crate::{indented, log_vec, LogItem, Loggable};

use dri_rs_core::{
    alarm::{AlarmDisplay, AlarmRecord, AlarmStatusMessage},
    header::DatexHeader,
    physiological::{
        groups::{
            AnesthesiaAgentGroup, CoWedgeGroup, EcgExtraGroup, FlowVolumeGroup, N2OGroup,
            NmtGroup, O2Group, SvO2Group,
        },
        AuxPhysiologicalInfo, PhdbRecord,
    },
    subrecord::{Subrecord, SubrecordPayload},
    waveform::Waveform,
    Decoded, DecodedRecord, Diagnostics, RecordSummary,
};

fn yes_no(value: bool) -> &'static str {
    if value {
        "Yes"
    } else {
        "No"
    }
}

impl Loggable for DatexHeader {
    fn as_log(&self) -> Vec<LogItem> {
        let mut log = log_vec![
            (0, "DRI record header"),
            (1, "Length", self.r_len),
            (1, "Record number", self.r_nbr),
            (1, "DRI level", self.dri_level_description()),
            (1, "Plug ID", format!("0x{:04X}", self.plug_id)),
            (1, "Time", self.r_time),
            (1, "Subnet", self.n_subnet),
            (1, "Main type", format!("{} ({})", self.main_type_name(), self.main_type.value())),
            (1, "Active subrecords", self.active_subrecord_count()),
            (1, "Subrecords"),
        ];

        for (index, desc) in self.subrecords.iter().enumerate() {
            let value = if desc.is_end_of_list() {
                "End of list".to_string()
            } else {
                format!("type {} at offset {}", desc.ty, desc.offset)
            };
            log.push((2, format!("#{index}"), value).into());
        }

        log
    }
}

impl Loggable for Waveform {
    fn as_log(&self) -> Vec<LogItem> {
        let status = self.header.flags();
        let values: Vec<_> = self
            .physical_values()
            .iter()
            .map(|v| format!("{v:.2}"))
            .collect();

        log_vec![
            (0, "Waveform"),
            (1, "Type", format!("{} ({})", self.ty, self.ty.value())),
            (1, "Samples", self.samples.len()),
            (1, "Sampling rate", format!("{} Hz", self.sampling_rate())),
            (1, "Duration", format!("{:.3} s", self.duration_secs())),
            (1, "Unit", self.unit()),
            (1, "Status", format!("0x{:04X} {status:?}", self.header.status)),
            (1, "Control codes", self.control_code_count()),
            (1, "Values", values.join(", ")),
        ]
    }
}

impl Loggable for PhdbRecord {
    fn as_log(&self) -> Vec<LogItem> {
        let declared = self
            .declared_class()
            .map(|c| c.to_string())
            .unwrap_or_else(|| "Unknown".into());

        log_vec![
            (0, "Physiological record"),
            (1, "Time", self.time),
            (1, "Class", self.data_class()),
            (1, "Declared class", declared),
            (1, "Payload", format!("{} bytes", self.data.bytes().len())),
            (1, "Marker", self.marker),
        ]
    }
}

impl Loggable for AuxPhysiologicalInfo {
    fn as_log(&self) -> Vec<LogItem> {
        log_vec![
            (0, "Auxiliary physiological info"),
            (1, "NIBP time", self.nibp_time),
            (1, "CO time", self.co_time),
            (1, "PCWP time", self.pcwp_time),
            (1, "Body surface area", format!("{:.2} m²", self.body_surface_area())),
        ]
    }
}

impl Loggable for O2Group {
    fn as_log(&self) -> Vec<LogItem> {
        log_vec![
            (0, "O2"),
            (1, "EtO2", format!("{:.2} %", self.et_percent())),
            (1, "FiO2", format!("{:.2} %", self.fi_percent())),
        ]
    }
}

impl Loggable for N2OGroup {
    fn as_log(&self) -> Vec<LogItem> {
        log_vec![
            (0, "N2O"),
            (1, "EtN2O", format!("{:.2} %", self.et_percent())),
            (1, "FiN2O", format!("{:.2} %", self.fi_percent())),
            (1, "Calibrating", yes_no(self.is_calibrating())),
            (1, "Measurement off", yes_no(self.is_measurement_off())),
        ]
    }
}

impl Loggable for AnesthesiaAgentGroup {
    fn as_log(&self) -> Vec<LogItem> {
        log_vec![
            (0, "Anesthesia agent"),
            (1, "Agent", self.agent()),
            (1, "Et", format!("{:.2} %", self.et_percent())),
            (1, "Fi", format!("{:.2} %", self.fi_percent())),
            (1, "MAC sum", format!("{:.2}", self.mac_sum())),
            (1, "Calibrating", yes_no(self.is_calibrating())),
            (1, "Measurement off", yes_no(self.is_measurement_off())),
        ]
    }
}

impl Loggable for FlowVolumeGroup {
    fn as_log(&self) -> Vec<LogItem> {
        log_vec![
            (0, "Flow and volume"),
            (1, "Respiration rate", format!("{} /min", self.respiration_rate())),
            (1, "Peak pressure", format!("{:.2} cmH2O", self.peak_pressure())),
            (1, "PEEP", format!("{:.2} cmH2O", self.peep())),
            (1, "Plateau pressure", format!("{:.2} cmH2O", self.plateau_pressure())),
            (1, "TV insp.", format!("{:.1} ml", self.inspiratory_tidal_volume())),
            (1, "TV exp.", format!("{:.1} ml", self.expiratory_tidal_volume())),
            (1, "Compliance", format!("{:.2} ml/cmH2O", self.compliance())),
            (1, "MV exp.", format!("{:.2} l/min", self.expiratory_minute_volume())),
            (1, "TV base", self.tv_base()),
            (1, "Status", format!("{:?}", self.status())),
        ]
    }
}

impl Loggable for CoWedgeGroup {
    fn as_log(&self) -> Vec<LogItem> {
        log_vec![
            (0, "Cardiac output and wedge pressure"),
            (1, "CO", format!("{} ml/min", self.cardiac_output())),
            (1, "Blood temperature", format!("{:.2} °C", self.blood_temperature())),
            (1, "REF", format!("{:.2} %", self.ejection_fraction())),
            (1, "PCWP", format!("{:.2} mmHg", self.wedge_pressure())),
            (1, "CO mode", self.co_mode()),
            (1, "CO over 60 s old", yes_no(self.is_co_over_60s_old())),
            (1, "PCWP over 60 s old", yes_no(self.is_pcwp_over_60s_old())),
        ]
    }
}

impl Loggable for NmtGroup {
    fn as_log(&self) -> Vec<LogItem> {
        log_vec![
            (0, "Neuromuscular transmission"),
            (1, "T1", format!("{:.1} %", self.t1_percent())),
            (1, "Ratio", format!("{:.1} %", self.tratio_percent())),
            (1, "Stimulus mode", self.stimulus_mode()),
            (1, "Pulse width", self.pulse_width()),
            (1, "PTC", self.post_tetanic_count()),
            (1, "TOF count", self.tof_count()),
            (1, "Stimulus current", format!("{} mA", self.stimulus_current())),
            (1, "Supramax current found", yes_no(self.is_supramax_current_found())),
            (1, "Calibrated", yes_no(self.is_calibrated())),
        ]
    }
}

impl Loggable for EcgExtraGroup {
    fn as_log(&self) -> Vec<LogItem> {
        log_vec![
            (0, "ECG extra"),
            (1, "HR", format!("{} /min", self.heart_rate())),
            (1, "HR max", format!("{} /min", self.max_heart_rate())),
            (1, "HR min", format!("{} /min", self.min_heart_rate())),
        ]
    }
}

impl Loggable for SvO2Group {
    fn as_log(&self) -> Vec<LogItem> {
        log_vec![
            (0, "Mixed venous saturation"),
            (1, self.saturation_type(), format!("{} %", self.value())),
            (1, "Status", format!("{:?}", self.status())),
        ]
    }
}

impl Loggable for AlarmDisplay {
    fn as_log(&self) -> Vec<LogItem> {
        let changed = match (self.text_changed, self.color_changed) {
            (true, true) => "text, color",
            (true, false) => "text",
            (false, true) => "color",
            (false, false) => "none",
        };

        log_vec![
            (0, self.text.as_str()),
            (1, "Color", self.color),
            (1, "Changed", changed),
        ]
    }
}

impl Loggable for AlarmStatusMessage {
    fn as_log(&self) -> Vec<LogItem> {
        let highest = self
            .highest_priority_alarm()
            .map(|(index, display)| format!("#{index} ({})", display.text))
            .unwrap_or_else(|| "None".into());

        let mut log = log_vec![
            (0, "Alarm status"),
            (1, "Sound on", yes_no(self.is_sound_on())),
            (1, "Silence", self.silence_info),
            (1, "Active alarms", self.active_alarm_count()),
            (1, "Highest priority", highest),
        ];

        for display in self.displays.iter().filter(|d| d.is_active()) {
            log.extend(indented(display.as_log(), 2));
        }

        log
    }
}

impl Loggable for AlarmRecord {
    fn as_log(&self) -> Vec<LogItem> {
        let mut log = self.header.as_log();

        match &self.status {
            Some(status) => log.extend(status.as_log()),
            None => log.push((0, "No alarm status").into()),
        }

        log
    }
}

impl Loggable for Subrecord {
    fn as_log(&self) -> Vec<LogItem> {
        let title = format!("Subrecord #{}", self.index);

        match &self.payload {
            SubrecordPayload::EndOfList => log_vec![(0, title, "End of list")],
            SubrecordPayload::Waveform(waveform) => with_title(title, waveform.as_log()),
            SubrecordPayload::Physiological { kind, record } => {
                let mut log = with_title(title, record.as_log());
                log.insert(2, (2, "Kind", kind).into());
                log
            }
            SubrecordPayload::AuxInfo(info) => with_title(title, info.as_log()),
            SubrecordPayload::AlarmStatus(status) => with_title(title, status.as_log()),
            SubrecordPayload::Raw { offset, len } => {
                log_vec![
                    (0, title),
                    (1, "Type", self.descriptor.ty),
                    (1, "Raw", format!("{len} bytes at offset {offset}")),
                ]
            }
            SubrecordPayload::OutOfBounds => {
                log_vec![(0, title, format!("Out of bounds (offset {})", self.descriptor.offset))]
            }
            SubrecordPayload::Invalid(error) => log_vec![(0, title, format!("Invalid: {error}"))],
        }
    }
}

fn with_title(title: String, items: Vec<LogItem>) -> Vec<LogItem> {
    let mut log: Vec<LogItem> = vec![(0, title).into()];
    log.extend(indented(items, 1));
    log
}

impl Loggable for DecodedRecord {
    fn as_log(&self) -> Vec<LogItem> {
        let mut log = self.header.as_log();

        for subrecord in self.subrecords.iter().filter(|s| !s.is_end_of_list()) {
            log.extend(indented(subrecord.as_log(), 1));
        }

        log
    }
}

impl Loggable for RecordSummary {
    fn as_log(&self) -> Vec<LogItem> {
        log_vec![
            (0, "Record summary"),
            (1, "Main type", self.main_type),
            (1, "Active subrecords", self.active_subrecords),
            (1, "Decoded subrecords", self.decoded_subrecords),
            (1, "Diagnostics", self.diagnostics),
        ]
    }
}

impl Loggable for Diagnostics {
    fn as_log(&self) -> Vec<LogItem> {
        let mut log = log_vec![(0, "Diagnostics")];

        log.extend(
            self.iter()
                .enumerate()
                .map(|(index, diagnostic)| LogItem::from((1, format!("#{index}"), diagnostic))),
        );

        log
    }
}

impl<T: Loggable> Loggable for Decoded<T> {
    fn as_log(&self) -> Vec<LogItem> {
        let mut log = self.value.as_log();

        if !self.diagnostics.is_clean() {
            log.extend(self.diagnostics.as_log());
        }

        log
    }
}
