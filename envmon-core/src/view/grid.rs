use crate::WeatherSnapshot;

use super::NO_DATA;

const CARDS_PER_ROW: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    pub label: &'static str,
    pub value: String,
}

/// The six cards, in display order.
pub fn cards(snapshot: &WeatherSnapshot, description: &str) -> [Card; 6] {
    [
        Card { label: "Temperature", value: format!("{}°C", snapshot.temperature) },
        Card { label: "Wind Speed", value: format!("{} km/h", snapshot.windspeed) },
        Card { label: "Wind Direction", value: format!("{}°", snapshot.winddirection) },
        Card {
            label: "Location",
            value: format!("{}°, {}°", snapshot.latitude, snapshot.longitude),
        },
        Card { label: "Elevation", value: format!("{}m", snapshot.elevation) },
        Card { label: "Weather", value: description.to_string() },
    ]
}

pub fn render(snapshot: Option<&WeatherSnapshot>, description: &str) -> String {
    let Some(snapshot) = snapshot else {
        return NO_DATA.to_string();
    };

    let cards = cards(snapshot, description);
    let width = cards
        .iter()
        .map(|c| c.label.chars().count().max(c.value.chars().count()))
        .max()
        .unwrap_or(0);

    cards
        .chunks(CARDS_PER_ROW)
        .map(|row| render_row(row, width))
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_row(row: &[Card], width: usize) -> String {
    let border = "─".repeat(width + 2);
    let top = vec![format!("┌{border}┐"); row.len()];
    let labels: Vec<String> = row.iter().map(|c| format!("│ {:<width$} │", c.label)).collect();
    let values: Vec<String> = row.iter().map(|c| format!("│ {:<width$} │", c.value)).collect();
    let bottom = vec![format!("└{border}┘"); row.len()];

    [top, labels, values, bottom].map(|line| line.join(" ")).join("\n")
}
