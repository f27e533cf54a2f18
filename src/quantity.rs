#[macro_use]
mod macros;

quantity!(Watts, u64, "W");
quantity!(WattHours, u64, "Wh");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_ok() {
        assert_eq!(Watts(1500).to_string(), "1500 W");
        assert_eq!(WattHours(99_999).to_string(), "99999 Wh");
    }

    #[test]
    fn debug_ok() {
        assert_eq!(format!("{:?}", Watts(1500)), "1500W");
    }

    #[test]
    fn deserialize_ok() -> Result<(), serde_json::Error> {
        assert_eq!(serde_json::from_str::<Watts>("1500")?, Watts(1500));
        Ok(())
    }
}
