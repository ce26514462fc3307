pub const SUBMIT_LABEL_IDLE: &str = "Comprimir PDFs";
pub const SUBMIT_LABEL_BUSY: &str = "Procesando...";
pub const FILE_LABEL: &str = "Archivo";
pub const LEVEL_LABEL: &str = "Nivel de compresión";
pub const DROP_HINT: &str = "Suelta el archivo ZIP aquí";
pub const SUCCESS_PREFIX: &str = "[OK]";
pub const ERROR_PREFIX: &str = "[ERROR]";
pub const PROGRESS_WIDTH: usize = 30;
