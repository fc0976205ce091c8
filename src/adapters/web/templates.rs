//! HTML templates using Askama.

use askama::Template;

#[derive(Template)]
#[template(path = "base.html")]
pub struct BasePage {
    pub title: String,
    pub content: String,
}

#[derive(Template)]
#[template(path = "form.html")]
pub struct BacktestFormTemplate {
    pub default_amount: String,
    pub default_allocations: String,
}

impl BacktestFormTemplate {
    pub fn fragment(&self) -> String {
        let mut html = String::from("<div id=\"content\"><h1>New Backtest</h1>");
        html.push_str("<form hx-post=\"/backtest/run\" hx-target=\".result-container\">");
        html.push_str(&format!(
            "<label>Initial amount: <input name=\"amount\" value=\"{}\"></label><br>",
            self.default_amount
        ));
        html.push_str(&format!(
            "<label>Allocations: <input name=\"allocations\" value=\"{}\" placeholder=\"SPY:60,TLT:40\"></label><br>",
            self.default_allocations
        ));
        html.push_str(
            "<label>Interval: <select name=\"interval\">\
             <option value=\"monthly\">monthly</option>\
             <option value=\"weekly\">weekly</option>\
             <option value=\"daily\">daily</option>\
             </select></label><br>",
        );
        html.push_str("<button type=\"submit\">Run Backtest</button>");
        html.push_str("</form>");
        html.push_str("<div class=\"result-container\"></div>");
        html.push_str("</div>");
        html
    }
}

pub struct PositionView {
    pub symbol: String,
    pub ratio: String,
    pub units: u64,
}

#[derive(Template)]
#[template(path = "result.html")]
pub struct ResultTemplate {
    pub start_date: String,
    pub end_date: String,
    pub amount: String,
    pub positions: Vec<PositionView>,
    pub final_total: String,
    pub chart_svg: String,
}

impl ResultTemplate {
    pub fn fragment(&self) -> String {
        let mut html = String::from("<div id=\"result-content\">");
        html.push_str("<h1>Backtest Result</h1>");
        html.push_str(&format!(
            "<p><strong>Window:</strong> {} to {}</p>",
            self.start_date, self.end_date
        ));
        html.push_str(&format!(
            "<p><strong>Initial amount:</strong> {}</p>",
            self.amount
        ));

        html.push_str("<h2>Positions</h2>");
        html.push_str("<table><tr><th>Symbol</th><th>Ratio</th><th>Units</th></tr>");
        for position in &self.positions {
            html.push_str(&format!(
                "<tr><td>{}</td><td>{}%</td><td>{}</td></tr>",
                position.symbol, position.ratio, position.units
            ));
        }
        html.push_str("</table>");

        html.push_str(&format!(
            "<h2>Value</h2><p><strong>Final total:</strong> {}</p>",
            self.final_total
        ));
        html.push_str(&self.chart_svg);
        html.push_str("</div>");
        html
    }
}

#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorTemplate {
    pub message: String,
    pub status: u16,
}
