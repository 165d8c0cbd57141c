pub mod dashboard;
pub mod file_list;
pub mod header;
pub mod login_form;
pub mod upload_area;
