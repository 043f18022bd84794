use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ConvertResult<T> = Result<T, ConvertError>;
pub type ParserResult<T> = ConvertResult<T>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConvertErrorCategory {
    InputValidationError,
    IoSystemError,
    ContainerError,
    InternalError,
}

impl ConvertErrorCategory {
    pub const fn exit_code(self) -> i32 {
        match self {
            Self::InputValidationError | Self::IoSystemError => 1,
            Self::ContainerError => 2,
            Self::InternalError => 3,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InputValidationError => "InputValidationError",
            Self::IoSystemError => "IoSystemError",
            Self::ContainerError => "ContainerError",
            Self::InternalError => "InternalError",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertError {
    category: ConvertErrorCategory,
    placeholder: &'static str,
    message: String,
}

impl ConvertError {
    pub fn new(
        category: ConvertErrorCategory,
        placeholder: &'static str,
        message: impl Into<String>,
    ) -> Self {
        Self {
            category,
            placeholder,
            message: message.into(),
        }
    }

    pub fn input_validation(placeholder: &'static str, message: impl Into<String>) -> Self {
        Self::new(
            ConvertErrorCategory::InputValidationError,
            placeholder,
            message,
        )
    }

    pub fn io_system(placeholder: &'static str, message: impl Into<String>) -> Self {
        Self::new(ConvertErrorCategory::IoSystemError, placeholder, message)
    }

    pub fn container(placeholder: &'static str, message: impl Into<String>) -> Self {
        Self::new(ConvertErrorCategory::ContainerError, placeholder, message)
    }

    pub fn internal(placeholder: &'static str, message: impl Into<String>) -> Self {
        Self::new(ConvertErrorCategory::InternalError, placeholder, message)
    }

    pub const fn category(&self) -> ConvertErrorCategory {
        self.category
    }

    pub const fn placeholder(&self) -> &'static str {
        self.placeholder
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn exit_code(&self) -> i32 {
        self.category.exit_code()
    }

    pub fn diagnostic_line(&self) -> String {
        format!("ERROR: [{}] {}", self.placeholder, self.message)
    }

    pub fn fatal_exit_line(&self) -> String {
        format!("FATAL EXIT CODE: {}", self.exit_code())
    }
}

impl Display for ConvertError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} [{}] {}",
            self.category.as_str(),
            self.placeholder,
            self.message
        )
    }
}

impl Error for ConvertError {}
