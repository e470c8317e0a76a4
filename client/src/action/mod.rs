pub mod conn;
pub mod fetch_graph;
pub mod list_graphs;
pub mod register_graph;
pub mod upload_graph;
