//! Dioxus RSX components for the weather region map.

mod data_source_selector;
mod date_range_picker;
mod header;
mod loading_spinner;
mod map_view;
mod notification_list;
mod region_list;
mod rules_editor;
mod sidebar;
mod stats_panel;
mod timeline_slider;

pub use data_source_selector::DataSourceSelector;
pub use date_range_picker::DateRangePicker;
pub use header::Header;
pub use loading_spinner::LoadingSpinner;
pub use map_view::{MapView, MAP_CANVAS_ID};
pub use notification_list::NotificationList;
pub use region_list::RegionList;
pub use rules_editor::RulesEditor;
pub use sidebar::Sidebar;
pub use stats_panel::StatsPanel;
pub use timeline_slider::TimelineSlider;
