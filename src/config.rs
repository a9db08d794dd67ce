use dri_rs_core::{physiological::ClassSelection, stream::Framing, DecodeOptions};
use dri_rs_log::LogOutput;

/// Settings of a [`Dri`](crate::Dri) decoder.
#[derive(Debug, Clone, Default)]
pub struct DecoderConfig {
    pub class_selection: ClassSelection,
    pub framing: Framing,
    /// Where to report the diagnostics of every decoded record.
    pub diagnostics_output: Option<LogOutput>,
    /// Fail with [`DriError::Diagnostics`](crate::DriError::Diagnostics)
    /// instead of returning a record that has diagnostics.
    pub strict: bool,
}

impl DecoderConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_class_selection(mut self, class_selection: ClassSelection) -> Self {
        self.class_selection = class_selection;
        self
    }

    pub fn with_framing(mut self, framing: Framing) -> Self {
        self.framing = framing;
        self
    }

    pub fn with_diagnostics_output(mut self, output: LogOutput) -> Self {
        self.diagnostics_output = Some(output);
        self
    }

    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub(crate) fn decode_options(&self) -> DecodeOptions {
        DecodeOptions::default().with_class_selection(self.class_selection)
    }
}
