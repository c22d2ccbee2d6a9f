//! Page configuration: schema, text format and persistence.
//!
//! ## config.yaml - Pages and settings
//!
//! Located at `{data-dir}/config.yaml`. Human-editable; created with the
//! defaults when missing.
//!
//! Contains:
//! - `title`, `maxLines`, `firstJoinPopup` - file-wide settings
//! - `page{n}Title`, `page{n}HeaderHint`, `page{n}Command`,
//!   `page{n}ButtonText`, `page{n}FooterText`, `page{n}NextPage` - per page
//! - `page{n}Lines:` followed by `- "text"` items
//!
//! ## acknowledged.txt - Users that saw the first-join popup
//!
//! Located at `{data-dir}/acknowledged.txt`, one id per line. See
//! [`crate::acknowledged`].
//!
//! Use the [`resolver`] module to find the data directory.

pub mod format;
pub mod persist;
pub mod resolver;
pub mod schema;

pub use format::{parse, serialize};
pub use persist::{load, save, try_save};
pub use resolver::{DATA_DIR_ENV, Resolved, ValueSource, resolve_data_dir};
pub use schema::{ACKNOWLEDGED_FILE, CONFIG_FILE, InfoConfig};
