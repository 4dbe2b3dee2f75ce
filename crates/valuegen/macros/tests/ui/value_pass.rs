use valuegen::Value;

#[derive(Debug, Clone, Copy, PartialEq, Value)]
pub struct Age(i32);

#[derive(Debug, Clone, PartialEq, Value)]
pub struct Email {
    value: String,
}

#[derive(Debug, Clone, PartialEq, Value)]
#[value(crate = ::valuegen)]
pub struct Quantity(Option<u32>);

fn main() {
    let age = Age::from_payload(42);
    assert_eq!(*age.payload(), 42);
    assert_eq!(age.into_payload(), 42);

    let email = Email::from_payload("a@example.com".to_owned());
    assert_eq!(email.payload(), "a@example.com");

    let quantity = Quantity::from_payload(None);
    assert_eq!(quantity.into_payload(), None);
}
