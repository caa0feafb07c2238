//! Alert message formatting.
//!
//! HTML-flavored text for the notification channel: headline with the
//! actual percentage move, price/target line, timestamp in the reference
//! timezone, closing line naming the rule that fired.

use super::evaluator::AlertHit;
use crate::domain::Decimal;
use chrono::DateTime;
use chrono_tz::Tz;

fn timestamp_line(ts: &DateTime<Tz>) -> String {
    format!("⏰ {} ({})", ts.format("%Y-%m-%d %H:%M"), ts.timezone().name())
}

pub fn owned_rise_text(hit: &AlertHit, shares: Option<Decimal>, ts: &DateTime<Tz>) -> String {
    let mut lines = vec![
        format!(
            "📈 <b>{}</b> is up +{}% from your entry (€{}).",
            hit.symbol,
            hit.pct_move.to_fixed(2),
            hit.reference.to_fixed(2)
        ),
        format!(
            "Current price: €{}  |  Target (≥ {}%): €{}",
            hit.last_price.to_fixed(2),
            hit.threshold_pct.to_fixed(0),
            hit.target.to_fixed(2)
        ),
    ];
    if let Some(shares) = shares {
        lines.push(format!("Shares: {}", shares));
    }
    lines.push(timestamp_line(ts));
    lines.push(String::new());
    lines.push("👉 Alert: take-profit threshold reached.".to_string());
    lines.join("\n")
}

pub fn watch_drop_text(hit: &AlertHit, ts: &DateTime<Tz>) -> String {
    format!(
        "🔻 <b>{}</b> is {}% below your baseline (€{}).\n\
         Current price: €{}  |  Target (≤ {}%): €{}\n\
         {}\n\n\
         👉 Alert: price dropped ≥{}% from baseline.",
        hit.symbol,
        hit.pct_move.to_fixed(2),
        hit.reference.to_fixed(2),
        hit.last_price.to_fixed(2),
        hit.threshold_pct.to_fixed(0),
        hit.target.to_fixed(2),
        timestamp_line(ts),
        hit.threshold_pct.to_fixed(0),
    )
}

pub fn universe_drop_text(hit: &AlertHit, universe: &str, ts: &DateTime<Tz>) -> String {
    format!(
        "🔻 <b>{}</b> ({}) is {}% below previous close (€{}).\n\
         Current price: €{}  |  Target (≤ {}%): €{}\n\
         {}\n\n\
         👉 Universe scan: drop ≥{}% vs previous close.",
        hit.symbol,
        universe,
        hit.pct_move.to_fixed(2),
        hit.reference.to_fixed(2),
        hit.last_price.to_fixed(2),
        hit.threshold_pct.to_fixed(0),
        hit.target.to_fixed(2),
        timestamp_line(ts),
        hit.threshold_pct.to_fixed(0),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ConditionKey, Symbol};

    fn d(s: &str) -> Decimal {
        Decimal::from_str_canonical(s).unwrap()
    }

    fn ts() -> DateTime<Tz> {
        DateTime::parse_from_rfc3339("2024-03-01T10:05:00+01:00")
            .unwrap()
            .with_timezone(&chrono_tz::Europe::Amsterdam)
    }

    fn rise_hit() -> AlertHit {
        AlertHit {
            key: ConditionKey::OwnedRise {
                symbol: Symbol::new("AAA"),
            },
            symbol: Symbol::new("AAA"),
            last_price: d("105.5"),
            reference: d("100"),
            target: d("105"),
            pct_move: d("5.5"),
            threshold_pct: d("5"),
        }
    }

    #[test]
    fn test_owned_text_with_shares() {
        let text = owned_rise_text(&rise_hit(), Some(d("12")), &ts());
        assert!(text.contains("📈 <b>AAA</b> is up +5.50% from your entry (€100.00)."));
        assert!(text.contains("Current price: €105.50  |  Target (≥ 5%): €105.00"));
        assert!(text.contains("Shares: 12"));
        assert!(text.contains("⏰ 2024-03-01 10:05 (Europe/Amsterdam)"));
    }

    #[test]
    fn test_owned_text_without_shares() {
        let text = owned_rise_text(&rise_hit(), None, &ts());
        assert!(!text.contains("Shares:"));
    }

    #[test]
    fn test_universe_text_names_universe_and_signed_move() {
        let hit = AlertHit {
            key: ConditionKey::UniverseDrop {
                universe: "AEX".to_string(),
                symbol: Symbol::new("ASML.AS"),
                drop_pct: 10,
            },
            symbol: Symbol::new("ASML.AS"),
            last_price: d("540"),
            reference: d("600"),
            target: d("540"),
            pct_move: d("-10"),
            threshold_pct: d("10"),
        };
        let text = universe_drop_text(&hit, "AEX", &ts());
        assert!(text.contains("<b>ASML.AS</b> (AEX) is -10.00% below previous close (€600.00)."));
        assert!(text.contains("👉 Universe scan: drop ≥10% vs previous close."));
    }
}
