pub mod card_detail;
pub mod force_graph;
