pub mod dashboard_model;
pub mod html;
pub mod render;
pub mod results_model;
