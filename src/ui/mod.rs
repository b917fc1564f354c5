pub mod icons;
pub mod output;
pub mod progress;
pub mod table;
pub mod theme;

pub use icons::Icons;
pub use output::{header, phase, status, success, timing, warn};
pub use progress::TableProgress;
pub use table::{report_table, TableBuilder};
pub use theme::{theme, Theme};
