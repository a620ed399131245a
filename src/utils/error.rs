use thiserror::Error;

#[derive(Error, Debug)]
pub enum DosageError {
    #[error("Invalid genotype '{genotype}' for marker {marker} (allowed: {allowed})")]
    InvalidGenotype {
        marker: String,
        genotype: String,
        allowed: String,
    },

    #[error("No genotype supplied for marker {marker}")]
    MissingGenotype { marker: String },

    #[error("Marker {marker} given twice ('{first}' and '{second}')")]
    DuplicateGenotype {
        marker: String,
        first: String,
        second: String,
    },

    #[error("Genotype supplied for unknown marker {marker}")]
    UnknownMarker { marker: String },

    #[error("Input '{field}' out of range ({value}): {reason}")]
    OutOfRangeInput {
        field: String,
        value: String,
        reason: String,
    },

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Configuration,
    Export,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl DosageError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            DosageError::InvalidGenotype { .. }
            | DosageError::MissingGenotype { .. }
            | DosageError::DuplicateGenotype { .. }
            | DosageError::UnknownMarker { .. }
            | DosageError::OutOfRangeInput { .. } => ErrorCategory::Input,
            DosageError::ConfigError { .. }
            | DosageError::ConfigValidationError { .. }
            | DosageError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            DosageError::CsvError(_)
            | DosageError::IoError(_)
            | DosageError::SerializationError(_)
            | DosageError::ZipError(_) => ErrorCategory::Export,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Input => ErrorSeverity::High,
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Export => match self {
                DosageError::IoError(_) => ErrorSeverity::Critical,
                _ => ErrorSeverity::Medium,
            },
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            DosageError::InvalidGenotype {
                marker, genotype, ..
            } => format!("Genotype '{}' is not valid for {}", genotype, marker),
            DosageError::MissingGenotype { marker } => {
                format!("Please provide a genotype for {}", marker)
            }
            DosageError::DuplicateGenotype { marker, .. } => {
                format!("{} was entered more than once", marker)
            }
            DosageError::UnknownMarker { marker } => {
                format!("{} is not part of the marker panel", marker)
            }
            DosageError::OutOfRangeInput { field, reason, .. } => {
                format!("The {} you entered is outside the supported range: {}", field, reason)
            }
            DosageError::CsvError(_)
            | DosageError::IoError(_)
            | DosageError::SerializationError(_)
            | DosageError::ZipError(_) => format!("Could not export the results: {}", self),
            _ => format!("Configuration problem: {}", self),
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            DosageError::InvalidGenotype { allowed, .. } => {
                format!("Use one of: {}", allowed)
            }
            DosageError::MissingGenotype { marker } => {
                format!("Add --genotype {}=<LABEL>", marker)
            }
            DosageError::DuplicateGenotype { marker, .. } => {
                format!("Pass --genotype {}=<LABEL> only once", marker)
            }
            DosageError::UnknownMarker { .. } => {
                "Run with --list-markers to see the configured panel".to_string()
            }
            DosageError::OutOfRangeInput { .. } => {
                "Check the age and weight values, or adjust [limits] in the config file".to_string()
            }
            DosageError::ConfigError { .. } => {
                "Check the --config path and file permissions".to_string()
            }
            DosageError::IoError(_) => {
                "Check that the output directory exists and is writable".to_string()
            }
            DosageError::CsvError(_)
            | DosageError::SerializationError(_)
            | DosageError::ZipError(_) => "Retry the export, or pick another --format".to_string(),
            _ => "Check the config file against the documented sections".to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, DosageError>;
