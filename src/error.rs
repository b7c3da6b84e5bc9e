use std::fmt;

/// All errors produced by notisched.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub enum ScheduleError {
    /// An IANA timezone name failed to resolve.
    Timezone { name: String, message: String },

    /// Calendar arithmetic or instant conversion failed.
    Eval { message: String },
}

impl fmt::Display for ScheduleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timezone { name, message } => {
                write!(f, "invalid timezone '{name}': {message}")
            }
            Self::Eval { message } => write!(f, "{message}"),
        }
    }
}

impl std::error::Error for ScheduleError {}

impl ScheduleError {
    pub fn timezone(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Timezone {
            name: name.into(),
            message: message.into(),
        }
    }

    pub fn eval(message: impl Into<String>) -> Self {
        Self::Eval {
            message: message.into(),
        }
    }
}
