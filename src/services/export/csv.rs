use bytes::{BufMut, Bytes, BytesMut};

use crate::services::store::UserRecord;

/// 导出表头
pub const CSV_HEADER: [&str; 3] = ["Twitter Username", "Solana Address", "Referral Count"];

// 将记录格式化为 CSV，第一行为表头，末尾不带换行
pub fn render_csv(records: &[UserRecord]) -> Bytes {
    let mut buf = BytesMut::with_capacity(64 * (records.len() + 1));
    write_row(&mut buf, CSV_HEADER.iter().copied());

    for record in records {
        buf.put_u8(b'\n');
        let count = record.referral_count.to_string();
        write_row(
            &mut buf,
            [
                record.social_handle.as_deref().unwrap_or_default(),
                record.wallet_address.as_str(),
                count.as_str(),
            ],
        );
    }

    buf.freeze()
}

fn write_row<'a>(buf: &mut BytesMut, fields: impl IntoIterator<Item = &'a str>) {
    for (i, field) in fields.into_iter().enumerate() {
        if i > 0 {
            buf.put_u8(b',');
        }
        write_field(buf, field);
    }
}

fn write_field(buf: &mut BytesMut, field: &str) {
    let needs_quotes = field.contains([',', '"', '\r', '\n']);
    if !needs_quotes {
        buf.put_slice(field.as_bytes());
        return;
    }

    buf.put_u8(b'"');
    for part in field.split_inclusive('"') {
        buf.put_slice(part.as_bytes());
        if part.ends_with('"') {
            buf.put_u8(b'"');
        }
    }
    buf.put_u8(b'"');
}
