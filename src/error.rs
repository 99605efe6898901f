/// Error carried up to `main`, paired with the process exit code.
///
/// Exit code conventions:
/// - `2` invalid input (bad arguments, unreadable or missing files)
/// - `3` invalid data content (malformed headers, inconsistent tables)
/// - `4` computation or output failure (fit, plotting, writing files)
/// - `5` an external program failed
#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn input(message: impl Into<String>) -> Self {
        Self::new(2, message)
    }

    pub fn data(message: impl Into<String>) -> Self {
        Self::new(3, message)
    }

    pub fn output(message: impl Into<String>) -> Self {
        Self::new(4, message)
    }

    pub fn external(message: impl Into<String>) -> Self {
        Self::new(5, message)
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}
