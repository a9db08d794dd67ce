use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use dri_rs::{
    dri_rs_core::{
        physiological::{ClassSelection, DataClass},
        stream::Framing,
    },
    DecoderConfig, Dri, LogOutput, Loggable,
};

#[derive(Clone, Copy, ValueEnum)]
enum FramingArg {
    LengthPrefix,
    Header,
}

#[derive(Clone, Copy, ValueEnum)]
enum ClassArg {
    /// Always decode physiological payloads as basic class
    Default,
    Basic,
    Ext1,
    Ext2,
    Ext3,
    /// Use the class the record declares
    Declared,
}

#[derive(Parser)]
struct CliOpts {
    /// A file holding a capture of DRI records
    #[clap(long, short, conflicts_with = "hex")]
    file: Option<PathBuf>,
    /// A capture of DRI records as a hex string
    #[clap(long)]
    hex: Option<String>,
    #[clap(long, value_enum, default_value = "length-prefix")]
    framing: FramingArg,
    #[clap(long, value_enum, default_value = "default")]
    class: ClassArg,
    /// Decode the capture as a single alarm record
    #[clap(long)]
    alarm: bool,
    /// Reject records that decode with diagnostics
    #[clap(long)]
    strict: bool,
}

impl CliOpts {
    fn config(&self) -> DecoderConfig {
        let framing = match self.framing {
            FramingArg::LengthPrefix => Framing::LengthPrefix,
            FramingArg::Header => Framing::Header,
        };

        let class_selection = match self.class {
            ClassArg::Default => ClassSelection::Default,
            ClassArg::Basic => ClassSelection::Explicit(DataClass::Basic),
            ClassArg::Ext1 => ClassSelection::Explicit(DataClass::Ext1),
            ClassArg::Ext2 => ClassSelection::Explicit(DataClass::Ext2),
            ClassArg::Ext3 => ClassSelection::Explicit(DataClass::Ext3),
            ClassArg::Declared => ClassSelection::FromClassWord,
        };

        DecoderConfig::new()
            .with_framing(framing)
            .with_class_selection(class_selection)
            .with_strict(self.strict)
            .with_diagnostics_output(LogOutput::LogTarget(log::Level::Warn, "decode".into()))
    }

    fn capture(&self) -> std::io::Result<Vec<u8>> {
        match (&self.file, &self.hex) {
            (Some(file), _) => std::fs::read(file),
            (None, Some(hex)) => hex::decode(hex.trim())
                .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e)),
            (None, None) => Err(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "either --file or --hex is required",
            )),
        }
    }
}

fn main() -> std::io::Result<()> {
    pretty_env_logger::init();

    let opts = CliOpts::parse();
    let data = opts.capture()?;
    let dri = Dri::new(opts.config());

    let log_output = &LogOutput::LogTarget(log::Level::Info, "decode".into());

    if opts.alarm {
        match dri.decode_alarm(&data) {
            Ok(alarm) => alarm.value.log(log_output),
            Err(e) => log::error!("Could not decode alarm record: {e}"),
        }
        return Ok(());
    }

    let (mut count, mut failed) = (0, 0);
    for record in dri.records(&data) {
        match record {
            Ok(record) => {
                record.value.log(log_output);
                record.summary().log(log_output);
                count += 1;
            }
            Err(_) => failed += 1,
        }
    }

    log::info!(
        "Decoded {count} record(s) from {} bytes, {failed} failed",
        data.len()
    );

    Ok(())
}
