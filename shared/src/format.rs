//! Brazilian display formatting for money and dates

use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};

/// Format an amount as Brazilian reais, e.g. `R$ 1.234,56`
pub fn format_brl(value: Decimal) -> String {
    let rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    format!("{}R$ {}", sign, format_decimal_br(rounded.abs(), 2))
}

/// Format a number with `.` thousands separators and `,` as decimal mark
pub fn format_decimal_br(value: Decimal, decimals: u32) -> String {
    let rounded = value.round_dp_with_strategy(decimals, RoundingStrategy::MidpointAwayFromZero);
    let text = format!("{:.*}", decimals as usize, rounded.abs());
    let (int_part, frac_part) = match text.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (text.as_str(), None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }

    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    match frac_part {
        Some(frac) => format!("{}{},{}", sign, grouped, frac),
        None => format!("{}{}", sign, grouped),
    }
}

/// Format a date as `dd/mm/yyyy`
pub fn format_date_br(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_brl() {
        assert_eq!(format_brl(Decimal::new(123456, 2)), "R$ 1.234,56");
        assert_eq!(format_brl(Decimal::from(247_500)), "R$ 247.500,00");
        assert_eq!(format_brl(Decimal::ZERO), "R$ 0,00");
        assert_eq!(format_brl(Decimal::new(5, 1)), "R$ 0,50");
    }

    #[test]
    fn test_format_brl_rounds_half_away_from_zero() {
        assert_eq!(format_brl(Decimal::new(10005, 3)), "R$ 10,01");
        assert_eq!(format_brl(Decimal::new(-10005, 3)), "-R$ 10,01");
    }

    #[test]
    fn test_format_brl_large_and_negative() {
        assert_eq!(format_brl(Decimal::from(1_234_567_890)), "R$ 1.234.567.890,00");
        assert_eq!(format_brl(Decimal::new(-99_999, 2)), "-R$ 999,99");
    }

    #[test]
    fn test_format_decimal_br() {
        assert_eq!(format_decimal_br(Decimal::new(171_5, 1), 2), "171,50");
        assert_eq!(format_decimal_br(Decimal::from(1000), 0), "1.000");
    }

    #[test]
    fn test_format_date_br() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        assert_eq!(format_date_br(date), "05/03/2024");
    }
}
