//! Basic smoke test to verify crate compiles.

#[test]
fn crate_compiles() {
    // If this test runs, the crate skeleton is valid.
    let _ = std::any::type_name::<sigward::VerifierConfig>();
    let _ = std::any::type_name::<sigward::SigwardError>();
    let _ = std::any::type_name::<sigward::RequestVerifier>();
}
