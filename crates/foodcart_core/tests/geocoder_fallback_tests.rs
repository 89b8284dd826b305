#![cfg(feature = "yandex")]

use std::time::Duration;

use foodcart_core::geocoder::{Geocoder, YandexGeocoder};

#[test]
fn unreachable_endpoint_degrades_to_unresolved() {
    let geocoder = YandexGeocoder::new("test-key", "http://127.0.0.1:9", Some(Duration::from_secs(2)))
        .expect("client builds");

    assert_eq!(geocoder.resolve("Moscow, Tverskaya 1"), None);
}
