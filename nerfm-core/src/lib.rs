pub mod error;

pub mod config;

pub mod logging;

pub mod fs {
    pub mod file_system;
    pub use file_system::{FileSystem, LocalFileSystem, WalkEntry};

    pub mod object_info;
    pub use object_info::{ObjectInfo, ObjectType};
}

pub mod model {
    pub mod annotation_store;
    pub use annotation_store::{AnnotationRecord, AnnotationStore};

    pub mod navigator;
    pub use navigator::Navigator;

    pub mod reference_index;
    pub use reference_index::DirectoryListing;
}

pub mod operators {
    pub mod file_system_operator;
    pub use file_system_operator::{
        CopyStats, CreateOutcome, DeleteReport, FileSystemOperator, ViewOutput,
    };
}

pub mod controller {
    pub mod clipboard_manager;
    pub use clipboard_manager::{ClipboardManager, PasteReport};

    pub mod commands;
    pub use commands::{Command, Verb};

    pub mod session;
    pub use session::{Reply, Session};

    pub mod shell;
    pub use shell::Shell;
}

pub mod view {
    pub mod listing;
}

pub use config::Config;
pub use controller::Session;
pub use error::AppError;
pub use logging::{LoggerBuilder, LoggerConfig};
