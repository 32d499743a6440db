struct OrderHarness;

#[test]
fn creates_orders() {
    let _ = OrderHarness;
}
