use crate::{ClosedUnitF64, NonNegativeF64, PositiveF64};

#[test]
fn rejects_values_outside_their_range() {
    assert!(NonNegativeF64::new(-0.5).is_err());
    assert!(NonNegativeF64::new(f64::NAN).is_err());
    assert!(PositiveF64::new(0.0).is_err());
    assert!(ClosedUnitF64::new(1.5).is_err());
    assert!(ClosedUnitF64::new(-0.0).is_ok());
}

#[test]
fn orders_by_inner_value() {
    let a = NonNegativeF64::new(0.25).unwrap();
    let b = NonNegativeF64::new(1.0).unwrap();

    assert!(a < b);
    assert_eq!((a + b).get(), 1.25);
    assert_eq!(NonNegativeF64::from(PositiveF64::one()), 1.0);
    assert_eq!(ClosedUnitF64::new(0.25).unwrap().one_minus(), 0.75);
}
