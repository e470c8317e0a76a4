use crate::action::conn::{Connection, ConnectionConfig};
use crate::error::ClientError;
use crate::extract_response;
use crate::format::table::{Schema, TableColumn, TableEntry, TableFormatter, format_table};
use crate::format::xterm_color;
use api_model::protocol::message::api_request_message::ApiRequestKind;
use api_model::protocol::message::api_response_message::ApiResponseKind;
use api_model::protocol::models::graph::graph_view::{GraphStatus, GraphView};
use api_model::protocol::models::graph::list_graphs::ListGraphsRequest;
use cli_handler::cli_impl;

static GRAPH_TABLE_SCHEMA: [&'static TableColumn; 4] = [
    &TableColumn {
        idx: 0,
        name: "Label",
    },
    &TableColumn {
        idx: 1,
        name: "Path",
    },
    &TableColumn {
        idx: 2,
        name: "Status",
    },
    &TableColumn {
        idx: 3,
        name: "Last modified",
    },
];

pub struct GraphTable;

impl Schema<4> for GraphTable {
    fn names() -> [&'static TableColumn; 4] {
        GRAPH_TABLE_SCHEMA
    }
}

impl TableEntry<4, GraphTable> for GraphView {
    fn fmt(&self) -> std::collections::HashMap<usize, String> {
        let mut map = std::collections::HashMap::new();
        map.insert(0, self.label.clone());
        map.insert(1, self.path.clone());
        map.insert(
            2,
            match self.status {
                GraphStatus::New => xterm_color::bold_green("new"),
                GraphStatus::Updated => xterm_color::bold_yellow("updated"),
                GraphStatus::Normal => "normal".to_string(),
                GraphStatus::Missing => xterm_color::bold_red("missing"),
            },
        );
        map.insert(
            3,
            self.display_mtime.clone().unwrap_or_else(|| "-".to_string()),
        );
        map
    }
}

#[cli_impl]
pub fn list_graphs(port: u16) -> Result<(), ClientError> {
    let conn = Connection::new(Some(ConnectionConfig::with_port(port)));

    let res = extract_response!(
        conn.request(ApiRequestKind::ListGraphs(ListGraphsRequest))?,
        ApiResponseKind::ListGraphs
    )?;

    let table_fmt = TableFormatter::<4, GraphTable>::new();
    let formatted_table = format_table(&table_fmt, &res.graphs);
    println!("{}", formatted_table);

    Ok(())
}
