mod apply;
mod config;
mod date_format;
mod exif_reader;
mod filename_date;
mod metadata;
mod pdf_reader;
mod planner;
mod providers;
mod sanitize;
mod scan;
mod video_reader;

pub const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d";
pub const FALLBACK_DATE_FORMAT: &str = "%Y-%m-%d_%H%M%S";
pub const DEFAULT_DCIM_PREFIXES: &[&str] = &[
    "IMG-", "IMG_", "DCIM", "WIN_", "MOV-", "MOV_", "DSC0", "DSC-", "DSC_", "DSCN", "VID-", "VID_",
];

pub use apply::{
    apply_suggestions, confirm_batch, execute_plan, present_suggestions, unique_target_path,
    RenameError, RenameFailure, RenameOperation, RenameReport, MAX_COLLISION_ATTEMPTS,
};
pub use config::{app_paths, load_config, load_config_from, AppConfig, AppPaths, ResolutionConfig};
pub use date_format::{validate_date_format, DateFormatError, EffectiveDateFormat};
pub use filename_date::{filename_timestamp, has_iso_date_prefix, parse_filename_date};
pub use metadata::{DateCandidate, DateSource, FileCategory, FileEntry};
pub use pdf_reader::parse_pdf_date;
pub use planner::{
    build_stem, generate_plan, resolve_date, resolve_entry, FileResolution, RenamePlan,
    RenameStats, RenameSuggestion,
};
pub use providers::{
    DateProvider, DocumentProvider, ImageProvider, MetadataProviderRegistry, VideoProvider,
};
pub use scan::discover_files;
