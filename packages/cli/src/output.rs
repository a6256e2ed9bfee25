//! Plain-text rendering of legends, tooltips and summaries.

use mansion_map_property::format::{format_change, format_currency, format_number};
use mansion_map_property_models::{
    GlobalMaxima,
    display::{
        BarChart, BarReading, ComparisonBar, ConstituencySummary, Legend, PostcodeSummary,
        Tooltip,
    },
};
use mansion_map_server_models::{ApiSearchResponse, ApiSearchResult};

pub fn print_lines(lines: &[String]) {
    for line in lines {
        println!("{line}");
    }
}

pub fn legend_lines(legend: &Legend) -> Vec<String> {
    let mut lines = vec![legend.title.clone()];
    lines.extend(
        legend
            .entries
            .iter()
            .map(|entry| format!("  {}  {}", entry.color, entry.label)),
    );
    if let Some(note) = &legend.note {
        lines.push(format!("  {note}"));
    }
    lines
}

pub fn maxima_lines(maxima: &GlobalMaxima) -> Vec<String> {
    vec![
        format!("Median price (2025):     {}", format_currency(maxima.price_2025)),
        format!("Price change since 1995: {}", format_change(maxima.change_pct, 1)),
        format!("Transactions:            {}", format_number(maxima.transactions)),
        format!(
            "Mansion tax properties:  {}",
            format_number(maxima.mansion_tax_properties)
        ),
    ]
}

pub fn tooltip_lines(tooltip: &Tooltip) -> Vec<String> {
    let mut lines = vec![tooltip.title.clone()];
    lines.extend(tooltip.lines.iter().map(|line| format!("  {line}")));
    lines
}

fn bar_line(bar: &ComparisonBar) -> String {
    match &bar.reading {
        BarReading::NoData => format!("{}: n/a", bar.label),
        BarReading::Value {
            formatted_value,
            formatted_max,
            ..
        } => format!("{}: {formatted_value} (max {formatted_max})", bar.label),
    }
}

fn chart_lines(title: &str, chart: Option<&BarChart>, lines: &mut Vec<String>) {
    if let Some(chart) = chart {
        lines.push(format!("{title}:"));
        lines.extend(chart.items.iter().map(|item| format!("  {}", item.tooltip)));
    }
}

pub fn constituency_lines(summary: &ConstituencySummary) -> Vec<String> {
    let mut lines = vec![match &summary.code {
        Some(code) => format!("{} ({code})", summary.name),
        None => summary.name.clone(),
    }];
    lines.push(bar_line(&summary.mansion_tax_properties));
    chart_lines("Sales by price band", summary.transactions.as_ref(), &mut lines);
    if summary.estimated_revenue > 0.0 {
        lines.push(format!(
            "Estimated revenue: {}",
            format_currency(summary.estimated_revenue)
        ));
    }
    chart_lines("Council tax bands", summary.council_tax.as_ref(), &mut lines);
    lines.push(bar_line(&summary.median_price));
    lines.push(bar_line(&summary.price_change));
    lines
}

pub fn postcode_lines(summary: &PostcodeSummary) -> Vec<String> {
    let mut lines = vec![summary.label.clone()];
    chart_lines("Sales by price band", summary.properties.as_ref(), &mut lines);
    if let Some(constituency) = &summary.constituency {
        lines.push(String::new());
        lines.extend(constituency_lines(constituency));
    }
    lines
}

pub fn search_lines(response: &ApiSearchResponse) -> Vec<String> {
    let mut lines: Vec<String> = response
        .results
        .iter()
        .map(|result| match result {
            ApiSearchResult::Constituency { name, code } => format!("{name}  {code}"),
            ApiSearchResult::Postcode {
                label, lat, lon, ..
            } => format!("{label}  ({lat:.5}, {lon:.5})"),
            ApiSearchResult::External {
                name,
                locality,
                lat,
                lon,
                zoom,
                ..
            } => {
                if locality.is_empty() {
                    format!("{name}  ({lat:.5}, {lon:.5}) z{zoom}")
                } else {
                    format!("{name}  [{locality}]  ({lat:.5}, {lon:.5}) z{zoom}")
                }
            }
        })
        .collect();
    if let Some(message) = &response.message {
        lines.push(message.clone());
    }
    lines
}
