// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: Apache-2.0

//! Test data generators for abuse simulation.

use lead_intake::forms::{ContactRequest, GdprRequest, GdprRequestType};
use std::net::{IpAddr, Ipv4Addr};

/// Generate a pool of client addresses for testing.
pub fn generate_ips(count: usize) -> Vec<IpAddr> {
    (0..count)
        .map(|i| {
            // Use 10.x.x.x private range
            let a = ((i >> 16) & 0xFF) as u8;
            let b = ((i >> 8) & 0xFF) as u8;
            let c = (i & 0xFF) as u8;
            IpAddr::V4(Ipv4Addr::new(10, a, b, c))
        })
        .collect()
}

/// A contact form that passes validation.
pub fn valid_contact(i: usize) -> ContactRequest {
    ContactRequest {
        name: format!("Visitor {i}"),
        email: format!("visitor{i}@example.com"),
        phone: Some("+39 02 1234 5678".to_string()),
        company: None,
        subject: Some("Preventivo".to_string()),
        message: "Vorrei informazioni su un nuovo sito web.".to_string(),
        privacy: true,
    }
}

/// A contact form that fails validation, cycling through failure kinds.
pub fn invalid_contact(i: usize) -> ContactRequest {
    let mut form = valid_contact(i);
    match i % 4 {
        0 => form.email = "not-an-email".to_string(),
        1 => form.message = "hi".to_string(),
        2 => form.privacy = false,
        _ => form.name = String::new(),
    }
    form
}

/// A GDPR request that passes validation.
pub fn valid_gdpr(i: usize) -> GdprRequest {
    GdprRequest {
        name: format!("Subject {i}"),
        email: format!("subject{i}@example.eu"),
        request_type: GdprRequestType::Erasure,
        details: None,
        privacy: true,
    }
}

/// A GDPR request that fails validation.
pub fn invalid_gdpr(i: usize) -> GdprRequest {
    let mut form = valid_gdpr(i);
    form.email = format!("subject{i}@@example.eu");
    form
}

/// Addresses that try to smuggle extra headers or recipients into mail.
pub fn hostile_emails() -> Vec<&'static str> {
    vec![
        "victim@example.com\r\nBcc: list@spam.example",
        "victim@example.com\nCc: list@spam.example",
        "victim@example.com, other@example.com",
        "victim@example.com other@example.com",
        "a@b@example.com",
        "victim@exam_ple.com",
        "victim@exa mple.com",
        "victim@-example.com",
        "victim@example.com.",
        "@example.com",
        "victim@",
        "victim@localhost",
    ]
}

/// Phone values that should never pass.
pub fn hostile_phones() -> Vec<&'static str> {
    vec![
        "12345",
        "+39 333 123 4567 8901 2345",
        "call me maybe",
        "+39 333<script>",
        "'; DROP TABLE leads;--",
        "++++++++",
        "0039\n3331234567",
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_ips() {
        let ips = generate_ips(256);
        assert_eq!(ips.len(), 256);
        // All should be unique
        let unique: std::collections::HashSet<_> = ips.iter().collect();
        assert_eq!(unique.len(), 256);
    }

    #[test]
    fn test_invalid_contacts_differ_from_valid() {
        for i in 0..8 {
            assert_ne!(invalid_contact(i), valid_contact(i));
        }
    }
}
