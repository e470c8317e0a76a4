pub mod fetch_graph;
pub mod graph_view;
pub mod list_graphs;
pub mod register_graph;
pub mod upload_graph;
