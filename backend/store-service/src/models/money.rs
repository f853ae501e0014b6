//! Money fields render as strings with exactly two decimal places

use rust_decimal::Decimal;
use serde::Serializer;

pub fn serialize<S: Serializer>(amount: &Decimal, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(&format_args!("{:.2}", amount))
}

pub fn serialize_opt<S: Serializer>(
    amount: &Option<Decimal>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match amount {
        Some(amount) => serialize(amount, serializer),
        None => serializer.serialize_none(),
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use serde::Serialize;
    use std::str::FromStr;

    #[derive(Serialize)]
    struct Priced {
        #[serde(serialize_with = "super::serialize")]
        price: Decimal,
        #[serde(serialize_with = "super::serialize_opt")]
        total: Option<Decimal>,
    }

    #[test]
    fn always_two_decimal_places() {
        let json = serde_json::to_value(Priced {
            price: Decimal::from(5000),
            total: Some(Decimal::from_str("19.9").unwrap()),
        })
        .unwrap();
        assert_eq!(json["price"], "5000.00");
        assert_eq!(json["total"], "19.90");

        let json = serde_json::to_value(Priced {
            price: Decimal::ZERO,
            total: None,
        })
        .unwrap();
        assert_eq!(json["price"], "0.00");
        assert!(json["total"].is_null());
    }
}
