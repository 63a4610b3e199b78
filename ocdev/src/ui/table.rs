use comfy_table::{Cell, ContentArrangement, Table};

use crate::service::{ApplicationSummary, ComponentSummary, UrlSummary};

/// Rendering of a list as a borderless table.
pub trait TableExt {
    fn render_table(&self) -> String;
}

fn table<const N: usize>(header: [&str; N], rows: Vec<[Cell; N]>) -> String {
    Table::new()
        .load_preset(comfy_table::presets::NOTHING)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header)
        .add_rows(rows)
        .to_string()
}

impl TableExt for [ApplicationSummary] {
    fn render_table(&self) -> String {
        let rows = self
            .iter()
            .map(|app| [Cell::new(&app.name), Cell::new(if app.active { "*" } else { "" })])
            .collect();
        table(["NAME", "ACTIVE"], rows)
    }
}

impl TableExt for [ComponentSummary] {
    fn render_table(&self) -> String {
        let rows = self
            .iter()
            .map(|component| [Cell::new(&component.name), Cell::new(&component.component_type)])
            .collect();
        table(["NAME", "TYPE"], rows)
    }
}

impl TableExt for [UrlSummary] {
    fn render_table(&self) -> String {
        let rows = self
            .iter()
            .map(|url| [Cell::new(&url.name), Cell::new(&url.component), Cell::new(&url.url)])
            .collect();
        table(["NAME", "COMPONENT", "URL"], rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_application_table() {
        let applications = [
            ApplicationSummary { name: "batch".to_string(), active: false },
            ApplicationSummary { name: "demo".to_string(), active: true },
        ];
        let rendered = applications.render_table();
        let lines = rendered
            .lines()
            .map(|line| line.split_whitespace().collect::<Vec<_>>())
            .filter(|words| !words.is_empty())
            .collect::<Vec<_>>();
        assert_eq!(lines, [vec!["NAME", "ACTIVE"], vec!["batch"], vec!["demo", "*"]]);
    }

    #[test]
    fn test_url_table() {
        let urls = [UrlSummary {
            name: "api-x7k2p".to_string(),
            component: "api".to_string(),
            url: "api-x7k2p-demo.apps.example.com".to_string(),
        }];
        let rendered = urls.render_table();
        assert!(rendered.contains("COMPONENT"));
        assert!(rendered.contains("api-x7k2p-demo.apps.example.com"));
    }
}
