mod canvas;
pub mod diagram;
pub mod force_graph;
