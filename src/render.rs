//! HTML rendering of a [`Page`].
//!
//! Charts are emitted as JSON configuration next to their target element
//! and drawn in the browser; grids arrive sorted with their cells already
//! formatted and are paged client side.

use crate::formatters::escape_html;
use crate::page::{Cell, Content, Page, PanelOutcome, Region, RegionEntry};
use crate::table::Grid;

const PATTERNFLY_CSS: &str =
    "https://cdnjs.cloudflare.com/ajax/libs/patternfly/3.59.5/css/patternfly.min.css";

fn json_for_script_tag(value: &str) -> String {
    value.replace("</", "<\\/")
}

pub fn render_page(page: &Page) -> String {
    let title = escape_html(&page.title);
    let nav = render_nav(page);
    let role = page
        .role
        .as_ref()
        .map(|r| format!(r#"<p class="role">Role: {}</p>"#, escape_html(r.as_str())))
        .unwrap_or_default();
    let sections: String = page.regions().iter().map(render_region).collect();

    format!(
        r####"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>{title}</title>
  <link rel="stylesheet" href="{PATTERNFLY_CSS}">
  <link rel="stylesheet" href="https://cdnjs.cloudflare.com/ajax/libs/c3/0.7.20/c3.min.css">
  <style>
    body {{ padding: 1.5em; }}
    .notice {{ color: #8b8d8f; font-style: italic; }}
    .notice.failed {{ color: #c00; }}
    .pager {{ margin-top: 0.5em; }}
  </style>
</head>
<body>
  <header>
    <h1>{title}</h1>
    {role}
    {nav}
  </header>
  <main>
{sections}  </main>

  <script src="https://cdnjs.cloudflare.com/ajax/libs/d3/5.16.0/d3.min.js"></script>
  <script src="https://cdnjs.cloudflare.com/ajax/libs/c3/0.7.20/c3.min.js"></script>
  <script>
    (function() {{
      document.querySelectorAll('script.chart-config').forEach(function(el) {{
        const cfg = JSON.parse(el.textContent);
        const tick = cfg.axis && cfg.axis.x && cfg.axis.x.tick;
        if (tick && typeof tick.format === 'string' && cfg.axis.x.type !== 'timeseries') {{
          tick.format = d3.format(tick.format);
        }}
        c3.generate(cfg);
      }});

      document.querySelectorAll('table.grid').forEach(function(table) {{
        const size = Number(table.dataset.pageLength || 10);
        const rows = Array.from(table.tBodies[0].rows);
        if (rows.length <= size) return;
        let page = 0;
        const pager = document.createElement('div');
        pager.className = 'pager';
        const prev = document.createElement('button');
        const next = document.createElement('button');
        const label = document.createElement('span');
        prev.textContent = 'Previous';
        next.textContent = 'Next';
        pager.append(prev, label, next);
        table.after(pager);

        function show() {{
          const pages = Math.ceil(rows.length / size);
          rows.forEach(function(row, i) {{
            row.hidden = Math.floor(i / size) !== page;
          }});
          label.textContent = ` ${{page + 1}} / ${{pages}} `;
          prev.disabled = page === 0;
          next.disabled = page + 1 >= pages;
        }}
        prev.addEventListener('click', function() {{ page -= 1; show(); }});
        next.addEventListener('click', function() {{ page += 1; show(); }});
        show();
      }});
    }})();
  </script>
</body>
</html>
"####,
    )
}

fn render_nav(page: &Page) -> String {
    if page.links.is_empty() {
        return String::new();
    }
    let links: Vec<String> = page
        .links
        .iter()
        .map(|l| {
            format!(
                r#"<a href="{}">{}</a>"#,
                escape_html(&l.href),
                escape_html(&l.label)
            )
        })
        .collect();
    format!(r#"<nav>{}</nav>"#, links.join(" | "))
}

fn render_region(entry: &RegionEntry) -> String {
    let id = escape_html(&entry.id);
    match &entry.region {
        Region::Hidden => format!("    <section id=\"region-{id}\" hidden></section>\n"),
        Region::Visible(outcome) => {
            format!(
                "    <section id=\"region-{id}\">\n{}    </section>\n",
                render_outcome(&id, outcome)
            )
        }
    }
}

fn render_outcome(id: &str, outcome: &PanelOutcome) -> String {
    match outcome {
        PanelOutcome::Populated(Content::Grid(grid)) => render_grid(id, grid),
        PanelOutcome::Populated(Content::Cells(cells)) => render_cells(id, cells),
        PanelOutcome::Populated(Content::Chart(config)) => {
            let json = serde_json::to_string(config).unwrap_or_else(|_| "{}".to_string());
            format!(
                concat!(
                    "      <div id=\"{id}\"></div>\n",
                    "      <script type=\"application/json\" class=\"chart-config\">{}</script>\n",
                ),
                json_for_script_tag(&json),
                id = id,
            )
        }
        PanelOutcome::Empty => "      <p class=\"notice\">No data available</p>\n".to_string(),
        PanelOutcome::Failed(reason) => format!(
            "      <p class=\"notice failed\">Unable to load: {}</p>\n",
            escape_html(reason)
        ),
    }
}

fn render_grid(id: &str, grid: &Grid) -> String {
    let mut html = format!(
        concat!(
            "      <table id=\"{id}\" class=\"grid table table-striped\"",
            " data-order=\"{}\" data-page-length=\"{}\">\n",
            "        <thead><tr>",
        ),
        escape_html(&format!(
            "[[{}, \"{}\"]]",
            grid.order.column,
            grid.order.direction.as_str()
        )),
        grid.page_length,
        id = id,
    );
    for column in &grid.columns {
        html.push_str(&format!("<th>{}</th>", escape_html(column)));
    }
    html.push_str("</tr></thead>\n        <tbody>\n");
    for (i, row) in grid.rows.iter().enumerate() {
        html.push_str("          <tr>");
        for (j, cell) in row.iter().enumerate() {
            // Cells are formatter output or already escaped.
            match grid.sort_keys.get(i).and_then(|keys| keys.get(j)).cloned().flatten() {
                Some(key) => html.push_str(&format!(
                    "<td data-order=\"{}\">{cell}</td>",
                    escape_html(&key)
                )),
                None => html.push_str(&format!("<td>{cell}</td>")),
            }
        }
        html.push_str("</tr>\n");
    }
    html.push_str("        </tbody>\n      </table>\n");
    html
}

fn render_cells(id: &str, cells: &[Cell]) -> String {
    let mut html = format!("      <table id=\"{id}\" class=\"statistics table\">\n");
    for cell in cells {
        html.push_str(&format!(
            "        <tr><th>{}</th><td id=\"{}\">{}</td></tr>\n",
            escape_html(&cell.label),
            escape_html(&cell.id),
            // Formatter output
            cell.value
        ));
    }
    html.push_str("      </table>\n");
    html
}
