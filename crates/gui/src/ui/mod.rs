pub mod issue_list;
pub mod popup;
pub mod status_bar;
pub mod toolbar;
