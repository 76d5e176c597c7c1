pub mod header;
pub mod kpi_card;
pub mod region_picker;
