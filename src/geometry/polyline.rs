//! Encoded polyline codec
//!
//! Each coordinate is a running sum of zig-zag encoded deltas, written as
//! 5-bit chunks offset by 63 (`?`). Continuation chunks carry the 0x20 bit.
//! Pairs are latitude-first.

/// Offset added to every 5-bit chunk
const CHAR_OFFSET: u8 = 63;

/// Continuation bit of a chunk
const CONTINUATION: i64 = 0x20;

/// Payload bits of a chunk
const CHUNK_MASK: i64 = 0x1f;

/// Decode a polyline into `(latitude, longitude)` pairs
///
/// Empty or malformed input (bytes outside `?`..=`~`, a truncated value, or a
/// latitude with no longitude) yields an empty sequence.
pub fn decode(encoded: &str, precision: u32) -> Vec<(f64, f64)> {
    try_decode(encoded.as_bytes(), precision).unwrap_or_default()
}

fn try_decode(bytes: &[u8], precision: u32) -> Option<Vec<(f64, f64)>> {
    let factor = 10f64.powi(precision as i32);
    let mut index = 0;
    let mut lat: i64 = 0;
    let mut lng: i64 = 0;
    let mut coordinates = Vec::new();

    while index < bytes.len() {
        lat = lat.checked_add(next_value(bytes, &mut index)?)?;
        lng = lng.checked_add(next_value(bytes, &mut index)?)?;
        coordinates.push((lat as f64 / factor, lng as f64 / factor));
    }

    Some(coordinates)
}

fn next_value(bytes: &[u8], index: &mut usize) -> Option<i64> {
    let mut result: i64 = 0;
    let mut shift = 0u32;

    loop {
        let byte = *bytes.get(*index)?;
        *index += 1;

        if !(CHAR_OFFSET..=b'~').contains(&byte) {
            return None;
        }
        // wider than any coordinate delta can be
        if shift > 55 {
            return None;
        }

        let chunk = (byte - CHAR_OFFSET) as i64;
        result |= (chunk & CHUNK_MASK) << shift;
        shift += 5;

        if chunk & CONTINUATION == 0 {
            break;
        }
    }

    Some(if result & 1 == 1 { !(result >> 1) } else { result >> 1 })
}

/// Encode `(latitude, longitude)` pairs, rounding to `precision` decimals
pub fn encode(coordinates: &[(f64, f64)], precision: u32) -> String {
    let factor = 10f64.powi(precision as i32);
    let mut output = String::new();
    let mut prev_lat: i64 = 0;
    let mut prev_lng: i64 = 0;

    for &(lat, lng) in coordinates {
        let lat = (lat * factor).round() as i64;
        let lng = (lng * factor).round() as i64;
        push_value(&mut output, lat - prev_lat);
        push_value(&mut output, lng - prev_lng);
        prev_lat = lat;
        prev_lng = lng;
    }

    output
}

fn push_value(output: &mut String, delta: i64) {
    let mut value = if delta < 0 { !(delta << 1) } else { delta << 1 };

    while value >= CONTINUATION {
        output.push(((CONTINUATION | (value & CHUNK_MASK)) as u8 + CHAR_OFFSET) as char);
        value >>= 5;
    }
    output.push((value as u8 + CHAR_OFFSET) as char);
}
