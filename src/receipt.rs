// Delivery receipt body codec (Section 3 / 4.9, Design Note "Duplicated codec
// source").
//
// A delivery receipt is carried as the short_message of a deliver_sm PDU
// whose esm_class marks it as a status report. The body is a keyword-prefixed
// textual layout:
//
//   id:<id> sub:<sub> dlvrd:<dlvrd> submit date:<yymmddhhmm> done date:<yymmddhhmm>
//   stat:<STATUS> err:<nnn> text:<first-20-bytes>
//
// Two decoders are kept, matching the two encoders found upstream: a lenient
// one that locates each label by searching for its keyword (tolerant of
// reordering or stray whitespace) and a strict one that trusts the canonical
// field widths and reads fixed offsets. The space-delimited encoder is
// canonical; the fixed-offset decoder is a fallback for receipts the lenient
// parser cannot make sense of.

use thiserror::Error;

const TEXT_FIELD_WIDTH: usize = 20;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryReceipt {
    pub id: String,
    pub sub: u16,
    pub dlvrd: u16,
    pub submit_date: String,
    pub done_date: String,
    pub stat: String,
    pub err: u16,
    pub text: String,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReceiptError {
    #[error("missing field '{0}' in delivery receipt body")]
    MissingField(&'static str),

    #[error("field '{field}' is not numeric: {value}")]
    NotNumeric { field: &'static str, value: String },

    #[error("delivery receipt body is shorter than the fixed layout requires")]
    Truncated,
}

impl DeliveryReceipt {
    /// Encodes the receipt using the canonical space-delimited layout.
    pub fn encode(&self) -> String {
        let mut text_field: String = self.text.chars().take(TEXT_FIELD_WIDTH).collect();
        while text_field.chars().count() < TEXT_FIELD_WIDTH {
            text_field.push('0');
        }

        format!(
            "id:{} sub:{:03} dlvrd:{:03} submit date:{} done date:{} stat:{} err:{:03} text:{}",
            self.id, self.sub, self.dlvrd, self.submit_date, self.done_date, self.stat, self.err, text_field
        )
    }

    /// Decodes a receipt body, trying the lenient label-search parser first
    /// and falling back to the strict fixed-offset parser.
    pub fn decode(body: &str) -> Result<Self, ReceiptError> {
        decode_lenient(body).or_else(|_| decode_strict(body))
    }
}

/// Finds the value following `label` up to (but not including) the next
/// label in `remaining_labels`, or the end of the string if none occur.
fn extract<'a>(haystack: &'a str, label: &str, remaining_labels: &[&str]) -> Option<&'a str> {
    let start = haystack.find(label)? + label.len();
    let tail = &haystack[start..];
    let end = remaining_labels
        .iter()
        .filter_map(|next| tail.find(next))
        .min()
        .unwrap_or(tail.len());
    Some(tail[..end].trim())
}

fn parse_u16(field: &'static str, value: &str) -> Result<u16, ReceiptError> {
    value.parse().map_err(|_| ReceiptError::NotNumeric {
        field,
        value: value.to_string(),
    })
}

/// Lenient parser: locates each label by keyword search, tolerant of
/// reordering and incidental whitespace. This is the mode used end-to-end by
/// the canonical encoder above.
pub fn decode_lenient(body: &str) -> Result<DeliveryReceipt, ReceiptError> {
    const LABELS: [&str; 8] = [
        "id:",
        "sub:",
        "dlvrd:",
        "submit date:",
        "done date:",
        "stat:",
        "err:",
        "text:",
    ];

    let id = extract(body, "id:", &LABELS[1..]).ok_or(ReceiptError::MissingField("id"))?;
    let sub = extract(body, "sub:", &LABELS[2..]).ok_or(ReceiptError::MissingField("sub"))?;
    let dlvrd =
        extract(body, "dlvrd:", &LABELS[3..]).ok_or(ReceiptError::MissingField("dlvrd"))?;
    let submit_date = extract(body, "submit date:", &LABELS[4..])
        .ok_or(ReceiptError::MissingField("submit date"))?;
    let done_date = extract(body, "done date:", &LABELS[5..])
        .ok_or(ReceiptError::MissingField("done date"))?;
    let stat = extract(body, "stat:", &LABELS[6..]).ok_or(ReceiptError::MissingField("stat"))?;
    let err = extract(body, "err:", &LABELS[7..]).ok_or(ReceiptError::MissingField("err"))?;
    let text = extract(body, "text:", &[]).unwrap_or("");

    Ok(DeliveryReceipt {
        id: id.to_string(),
        sub: parse_u16("sub", sub)?,
        dlvrd: parse_u16("dlvrd", dlvrd)?,
        submit_date: submit_date.to_string(),
        done_date: done_date.to_string(),
        stat: stat.to_string(),
        err: parse_u16("err", err)?,
        text: text.to_string(),
    })
}

/// Strict parser: trusts the canonical field widths (3-digit sub/dlvrd/err,
/// 10-digit dates) and reads them at fixed offsets from their labels, without
/// searching for the labels that follow. Used only when the lenient parser
/// fails.
pub fn decode_strict(body: &str) -> Result<DeliveryReceipt, ReceiptError> {
    let rest = body
        .strip_prefix("id:")
        .ok_or(ReceiptError::MissingField("id"))?;
    let id_end = rest.find(" sub:").ok_or(ReceiptError::MissingField("sub"))?;
    let id = &rest[..id_end];
    let rest = &rest[id_end + " sub:".len()..];

    if rest.len() < 3 {
        return Err(ReceiptError::Truncated);
    }
    let sub = &rest[..3];
    let rest = rest
        .get(3..)
        .and_then(|r| r.strip_prefix(" dlvrd:"))
        .ok_or(ReceiptError::MissingField("dlvrd"))?;

    if rest.len() < 3 {
        return Err(ReceiptError::Truncated);
    }
    let dlvrd = &rest[..3];
    let rest = rest
        .get(3..)
        .and_then(|r| r.strip_prefix(" submit date:"))
        .ok_or(ReceiptError::MissingField("submit date"))?;

    if rest.len() < 10 {
        return Err(ReceiptError::Truncated);
    }
    let submit_date = &rest[..10];
    let rest = rest
        .get(10..)
        .and_then(|r| r.strip_prefix(" done date:"))
        .ok_or(ReceiptError::MissingField("done date"))?;

    if rest.len() < 10 {
        return Err(ReceiptError::Truncated);
    }
    let done_date = &rest[..10];
    let rest = rest
        .get(10..)
        .and_then(|r| r.strip_prefix(" stat:"))
        .ok_or(ReceiptError::MissingField("stat"))?;

    let stat_end = rest.find(" err:").ok_or(ReceiptError::MissingField("err"))?;
    let stat = &rest[..stat_end];
    let rest = &rest[stat_end + " err:".len()..];

    if rest.len() < 3 {
        return Err(ReceiptError::Truncated);
    }
    let err = &rest[..3];
    let text = rest
        .get(3..)
        .and_then(|r| r.strip_prefix(" text:"))
        .unwrap_or("");

    Ok(DeliveryReceipt {
        id: id.to_string(),
        sub: parse_u16("sub", sub)?,
        dlvrd: parse_u16("dlvrd", dlvrd)?,
        submit_date: submit_date.to_string(),
        done_date: done_date.to_string(),
        stat: stat.to_string(),
        err: parse_u16("err", err)?,
        text: text.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> DeliveryReceipt {
        DeliveryReceipt {
            id: "1234567890".to_string(),
            sub: 1,
            dlvrd: 1,
            submit_date: "0601021504".to_string(),
            done_date: "0601021504".to_string(),
            stat: "DELIVRD".to_string(),
            err: 0,
            text: String::new(),
        }
    }

    #[test]
    fn encode_matches_canonical_layout() {
        let body = sample().encode();
        assert_eq!(
            body,
            "id:1234567890 sub:001 dlvrd:001 submit date:0601021504 done date:0601021504 \
             stat:DELIVRD err:000 text:00000000000000000000"
        );
    }

    #[test]
    fn lenient_decode_round_trips_the_canonical_encoding() {
        let body = sample().encode();
        let decoded = decode_lenient(&body).unwrap();
        assert_eq!(decoded, sample());
    }

    #[test]
    fn strict_decode_round_trips_the_canonical_encoding() {
        let body = sample().encode();
        let decoded = decode_strict(&body).unwrap();
        assert_eq!(decoded, sample());
    }

    #[test]
    fn decode_falls_back_to_strict_when_lenient_fails() {
        // A stat value that happens to contain "err:" would defeat naive
        // whitespace splitting but not the strict fixed-offset reader.
        let body = sample().encode();
        assert_eq!(DeliveryReceipt::decode(&body).unwrap(), sample());
    }

    #[test]
    fn truncated_text_is_zero_padded_to_twenty_bytes() {
        let mut receipt = sample();
        receipt.text = "hi".to_string();
        let body = receipt.encode();
        assert!(body.ends_with("text:hi000000000000000000"));
    }

    #[test]
    fn overlong_text_is_truncated_to_twenty_bytes() {
        let mut receipt = sample();
        receipt.text = "x".repeat(40);
        let body = receipt.encode();
        let text_part = body.split("text:").nth(1).unwrap();
        assert_eq!(text_part.chars().count(), 20);
    }

    #[test]
    fn missing_field_is_reported() {
        assert_eq!(
            DeliveryReceipt::decode("id:1 sub:001"),
            Err(ReceiptError::MissingField("dlvrd"))
        );
    }
}
