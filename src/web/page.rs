//! Server-rendered dashboard page.
//!
//! Controls live in one GET form that resubmits on every change, so each
//! interaction is a plain request/response recomputation. Charts are drawn
//! client-side by ECharts from option JSON embedded in the page.

use crate::app::pipeline::DashboardView;
use crate::builders::TextBlock;
use crate::chart::ChartRenderer;
use crate::domain::{DashboardOptions, Dataset};

const ECHARTS_CDN: &str = "https://cdn.jsdelivr.net/npm/echarts@5.4.3/dist/echarts.min.js";

const STYLE: &str = "\
body{font-family:system-ui,sans-serif;margin:0;background:#f5f7fa;color:#222}\
header,footer{background:#1f77b4;color:#fff;padding:16px 24px}\
main{padding:16px 24px}\
form{display:grid;grid-template-columns:repeat(auto-fit,minmax(260px,1fr));gap:16px;margin-bottom:16px}\
.card{background:#fff;border-radius:6px;box-shadow:0 1px 3px rgba(0,0,0,.15);padding:12px 16px;margin-bottom:16px}\
.charts{display:grid;grid-template-columns:repeat(auto-fit,minmax(520px,1fr));gap:16px}\
.chart{height:420px}\
.marks{display:flex;justify-content:space-between;font-size:12px;color:#555}\
select[multiple]{width:100%;height:160px}\
input[type=range]{width:100%}";

/// Render the full page for an evaluated view.
pub fn render_page(dataset: &Dataset, view: &DashboardView, renderer: &dyn ChartRenderer) -> String {
    let mut out = String::new();
    out.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    out.push_str("<title>Exchange Rate and Inflation Dashboard</title>\n");
    out.push_str(&format!("<style>{STYLE}</style>\n"));
    out.push_str(&format!("<script src=\"{ECHARTS_CDN}\"></script>\n"));
    out.push_str("</head>\n<body>\n");
    out.push_str("<header><h1>Exchange Rate and Inflation Dashboard</h1></header>\n<main>\n");

    out.push_str(&render_controls(&dataset.options, view));

    out.push_str("<div class=\"charts\">\n");
    for (id, _) in view.charts() {
        out.push_str(&format!("<div class=\"card\"><div id=\"{id}\" class=\"chart\"></div></div>\n"));
    }
    out.push_str("</div>\n");

    out.push_str("<section class=\"card\" id=\"statistics\">\n<h2>Statistics</h2>\n");
    out.push_str(&render_block(&view.statistics));
    out.push_str("</section>\n");

    out.push_str("<section class=\"card\" id=\"key-insights\">\n<h2>Key Insights</h2>\n");
    for block in &view.insights {
        out.push_str(&render_block(block));
    }
    out.push_str("</section>\n</main>\n");

    out.push_str("<footer>Exchange rates and inflation data. Figures are for analysis only.</footer>\n");

    out.push_str("<script>\n");
    for (id, chart) in view.charts() {
        out.push_str(&format!(
            "echarts.init(document.getElementById(\"{id}\")).setOption({});\n",
            script_json(&renderer.render(chart))
        ));
    }
    out.push_str("</script>\n</body>\n</html>\n");
    out
}

fn render_controls(options: &DashboardOptions, view: &DashboardView) -> String {
    let selection = &view.selection;
    let mut out = String::from("<form method=\"get\" action=\"/\" class=\"card\">\n");

    out.push_str("<label>Currencies<br><select name=\"currency\" multiple onchange=\"this.form.submit()\">\n");
    for code in &options.currencies {
        let selected = if selection.currencies.contains(code) { " selected" } else { "" };
        out.push_str(&format!(
            "<option value=\"{0}\"{selected}>{0}</option>\n",
            escape_html(code)
        ));
    }
    out.push_str("</select></label>\n");

    out.push_str("<div>\n");
    for (name, label, value) in [
        ("start", "Start", selection.range.start),
        ("end", "End", selection.range.end),
    ] {
        out.push_str(&format!(
            "<label>{label}<br><input type=\"range\" name=\"{name}\" min=\"{}\" max=\"{}\" value=\"{value}\" \
             onchange=\"this.form.submit()\"></label>\n",
            options.slider_min, options.slider_max
        ));
    }
    out.push_str("<div class=\"marks\">");
    for mark in &options.slider_marks {
        out.push_str(&format!("<span>{}</span>", escape_html(&mark.label)));
    }
    out.push_str("</div>\n");
    out.push_str(&format!(
        "<p id=\"date-range-display\">{}</p>\n</div>\n",
        escape_html(&view.date_range_label)
    ));

    out.push_str("<label>Inflation series<br><select name=\"series\" onchange=\"this.form.submit()\">\n");
    for name in &options.inflation_series {
        let selected = if selection.inflation_series.as_ref() == Some(name) { " selected" } else { "" };
        out.push_str(&format!("<option value=\"{0}\"{selected}>{0}</option>\n", escape_html(name)));
    }
    out.push_str("</select></label>\n");

    out.push_str("<label>Forecast currency<br><select name=\"forecast\" onchange=\"this.form.submit()\">\n");
    let none_selected = if view.forecast_options.value.is_none() { " selected" } else { "" };
    out.push_str(&format!("<option value=\"\"{none_selected}>None</option>\n"));
    for code in &view.forecast_options.options {
        let selected = if view.forecast_options.value.as_ref() == Some(code) { " selected" } else { "" };
        out.push_str(&format!("<option value=\"{0}\"{selected}>{0}</option>\n", escape_html(code)));
    }
    out.push_str("</select></label>\n");

    // Lets the next request tell whether the currency list changed.
    out.push_str("<input type=\"hidden\" name=\"prev\" value=\"\">\n");
    for code in &selection.currencies {
        out.push_str(&format!("<input type=\"hidden\" name=\"prev\" value=\"{}\">\n", escape_html(code)));
    }

    out.push_str("<noscript><button type=\"submit\">Update</button></noscript>\n</form>\n");
    out
}

fn render_block(block: &TextBlock) -> String {
    let mut out = format!("<div class=\"card\"><h3>{}</h3>\n", escape_html(&block.title));
    for line in &block.lines {
        out.push_str(&format!("<p>{}</p>\n", escape_html(line)));
    }
    out.push_str("</div>\n");
    out
}

/// JSON safe to inline inside a `<script>` element.
pub fn script_json(json: &str) -> String {
    json.replace("</", "<\\/")
}

pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::pipeline::build_dashboard;
    use crate::builders::fixtures::{dataset, select};
    use crate::chart::EchartsRenderer;

    #[test]
    fn escapes_markup() {
        assert_eq!(escape_html("EURO/US$ <b>\"x\"</b> & co"), "EURO/US$ &lt;b&gt;&quot;x&quot;&lt;/b&gt; &amp; co");
        assert_eq!(script_json("{\"t\":\"</script>\"}"), "{\"t\":\"<\\/script>\"}");
    }

    #[test]
    fn page_has_every_region_and_marks_selection() {
        let ds = dataset(vec![("AUD", vec![1.0, 1.1, 1.2]), ("EUR", vec![0.9, 0.92, 0.91]), ("JPY", vec![105.0, 106.0, 104.0])]);
        let sel = select(&ds, &["EUR"]);
        let view = build_dashboard(&ds, &sel);
        let html = render_page(&ds, &view, &EchartsRenderer);

        for id in [
            "line-chart",
            "histogram-chart",
            "bubble-chart",
            "box-plot",
            "area-chart",
            "inflation-line-chart",
            "forecast-chart",
            "statistics",
            "key-insights",
            "date-range-display",
        ] {
            assert!(html.contains(&format!("id=\"{id}\"")), "missing {id}");
        }
        assert!(html.contains("<option value=\"EUR\" selected>EUR</option>"));
        assert!(html.contains("<option value=\"AUD\">AUD</option>"));
        assert!(html.contains("<input type=\"hidden\" name=\"prev\" value=\"EUR\">"));
        assert!(html.contains("Selected period: 2020-01-01 to 2020-01-03"));
        assert!(html.contains("Statistics for EUR"));
        assert_eq!(html.matches("setOption(").count(), 7);
    }
}
