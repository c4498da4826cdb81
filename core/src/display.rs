//! Human-readable figures for the side panel.

use crate::snapshot::BankSnapshot;
use serde::Serialize;

/// `1_234_567_890 -> "1.23B"`, `2_500_000 -> "2.50M"`, `1_500 -> "1.5k"`,
/// anything below a thousand is printed as is. A value that would round
/// to 1000 of one unit is shown in the next unit up (`999_999 -> "1.00M"`).
pub fn format_magnitude(n: i64) -> String {
    let v = n as f64;
    if n >= 999_995_000 {
        format!("{:.2}B", v / 1_000_000_000.0)
    } else if n >= 999_950 {
        format!("{:.2}M", v / 1_000_000.0)
    } else if n >= 1_000 {
        format!("{:.1}k", v / 1_000.0)
    } else {
        n.to_string()
    }
}

/// What the UI layer renders after each bank recalculation.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct PanelView {
    pub bank_value:      String,
    pub bank_coins:      String,
    pub inventory_coins: String,
}

impl PanelView {
    pub fn from_snapshot(s: &BankSnapshot) -> Self {
        Self {
            bank_value:      format_magnitude(s.bank_ge_value),
            bank_coins:      format_magnitude(s.bank_coins),
            inventory_coins: format_magnitude(s.inventory_coins),
        }
    }

    pub fn lines(&self) -> [String; 3] {
        [
            format!("Bank GE Value: {} gp", self.bank_value),
            format!("Bank Coins: {}", self.bank_coins),
            format!("Inventory Coins: {}", self.inventory_coins),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn magnitude_thresholds() {
        assert_eq!(format_magnitude(0), "0");
        assert_eq!(format_magnitude(999), "999");
        assert_eq!(format_magnitude(1_000), "1.0k");
        assert_eq!(format_magnitude(1_560), "1.6k");
        assert_eq!(format_magnitude(999_949), "999.9k");
        assert_eq!(format_magnitude(999_950), "1.00M");
        assert_eq!(format_magnitude(999_999), "1.00M");
        assert_eq!(format_magnitude(999_994_999), "999.99M");
        assert_eq!(format_magnitude(999_995_000), "1.00B");
        assert_eq!(format_magnitude(1_000_000), "1.00M");
        assert_eq!(format_magnitude(2_500_000), "2.50M");
        assert_eq!(format_magnitude(1_234_567_890), "1.23B");
        assert_eq!(format_magnitude(-5), "-5");
    }

    #[test]
    fn panel_lines_use_labels() {
        let view = PanelView::from_snapshot(&BankSnapshot::new(12_000_000, 5_000, 20));
        assert_eq!(
            view.lines(),
            [
                "Bank GE Value: 12.00M gp".to_string(),
                "Bank Coins: 5.0k".to_string(),
                "Inventory Coins: 20".to_string(),
            ]
        );
    }
}
