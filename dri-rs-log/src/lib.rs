//! Human readable output for structures decoded by [`dri_rs_core`].
//!
//! Types implement [`Loggable`] to describe themselves as a list of
//! indented title/value pairs, which [`Logger`] prints to a [`LogOutput`].

mod impls;

#[derive(Debug, Clone)]
pub enum LogOutput {
    Log(log::Level),
    LogTarget(log::Level, String),
    StdOut,
    StdErr,
    #[cfg(feature = "log-to-file")]
    File(std::sync::Arc<parking_lot::Mutex<std::fs::File>>),
}

impl From<log::Level> for LogOutput {
    fn from(value: log::Level) -> Self {
        Self::Log(value)
    }
}

impl LogOutput {
    #[cfg(feature = "log-to-file")]
    pub fn file(file: std::fs::File) -> Self {
        Self::File(std::sync::Arc::new(parking_lot::Mutex::new(file)))
    }

    fn print(&self, msg: &str) {
        match self {
            LogOutput::Log(level) => log::log!(*level, "{}", msg),
            LogOutput::LogTarget(level, target) => {
                log::log!(target: target, *level, "{}", msg)
            }
            LogOutput::StdOut => println!("{}", msg),
            LogOutput::StdErr => eprintln!("{}", msg),
            #[cfg(feature = "log-to-file")]
            LogOutput::File(file) => {
                use std::io::Write;

                let mut file = file.lock();
                file.write_all(msg.as_bytes()).ok();
                file.write_all(b"\n").ok();
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogItem {
    level: usize,
    title: String,
    value: Option<String>,
}

impl LogItem {
    pub fn new<T: Into<String>, V: Into<String>>(level: usize, title: T, value: Option<V>) -> Self {
        Self {
            level,
            title: title.into(),
            value: value.map(Into::into),
        }
    }

    pub fn level(&self) -> usize {
        self.level
    }

    /// Move the item `by` levels to the right.
    pub fn indent(mut self, by: usize) -> Self {
        self.level += by;
        self
    }

    fn render(&self, align: usize) -> String {
        let front_padding = " ".repeat(self.level * 2);

        match &self.value {
            Some(value) => {
                let value_padding = " ".repeat(align.saturating_sub(self.title.len()));
                format!("{front_padding}{}: {value_padding}{value}", self.title)
            }
            None => format!("{front_padding}{}", self.title),
        }
    }
}

impl<T: ToString, V: ToString> From<(usize, T, V)> for LogItem {
    fn from((level, title, value): (usize, T, V)) -> Self {
        Self::new(level, title.to_string(), Some(value.to_string()))
    }
}

impl<T: ToString> From<(usize, T)> for LogItem {
    fn from((level, value): (usize, T)) -> Self {
        Self::new::<_, String>(level, value.to_string(), None)
    }
}

pub struct Logger;

impl Logger {
    pub fn log<T>(output: &LogOutput, loggable: &T)
    where
        T: Loggable + ?Sized,
    {
        Self::render(loggable)
            .iter()
            .for_each(|line| output.print(line));
    }

    /// The lines [`Logger::log`] prints for `loggable`.
    ///
    /// Values are aligned within each run of consecutive items at the same
    /// level.
    pub fn render<T>(loggable: &T) -> Vec<String>
    where
        T: Loggable + ?Sized,
    {
        let items = loggable.as_log();
        let mut lines = Vec::with_capacity(items.len());

        let mut start = 0;
        while start < items.len() {
            let level = items[start].level;
            let run = items[start..]
                .iter()
                .take_while(|i| i.level == level)
                .count();
            let group = &items[start..start + run];

            let align = group
                .iter()
                .filter(|i| i.value.is_some())
                .map(|i| i.title.len())
                .max()
                .unwrap_or(0);

            lines.extend(group.iter().map(|i| i.render(align)));
            start += run;
        }

        lines
    }
}

pub trait Loggable {
    fn as_log(&self) -> Vec<LogItem>;

    fn log(&self, output: &LogOutput) {
        Logger::log(output, self)
    }
}

/// Indent every item of `items` by `by` levels.
pub fn indented(items: Vec<LogItem>, by: usize) -> Vec<LogItem> {
    items.into_iter().map(|i| i.indent(by)).collect()
}

#[macro_export]
macro_rules ! log_vec {
    [$($msg:tt)*] => {
        $crate::to_log!(vec: $($msg)*)
    }
}

#[macro_export]
macro_rules! to_log {
    ([$($array:tt)*],) => {
        vec![$($array)*]
    };

    ([$($array:tt)*], ($level:literal, $title:expr, $value:expr)) => {
        $crate::to_log!([$($array)* $crate::LogItem::from(($level, $title, $value)),],)
    };

    ([$($array:tt)*], ($level:literal, $title:expr)) => {
        $crate::to_log!([$($array)* $crate::LogItem::from(($level, $title)),],)
    };

    ([$($array:tt)*], ($level:literal, $title:expr, $value:expr), $($msg:tt)*) => {
        $crate::to_log!([$($array)* $crate::LogItem::from(($level, $title, $value)),], $($msg)*)
    };

    ([$($array:tt)*], ($level:literal, $title:expr), $($msg:tt)*) => {
        $crate::to_log!([$($array)* $crate::LogItem::from(($level, $title)),], $($msg)*)
    };

    (vec: $($msg:tt)*) => {
        $crate::to_log!([], $($msg)*)
    };
}
