use hickory_proto::rr::{Name, RData, Record, RecordType};

/// Target of `record` if it is a CNAME.
pub fn cname_target(record: &Record) -> Option<Name> {
    match record.data() {
        RData::CNAME(cname) => Some(cname.0.clone()),
        _ => None,
    }
}

pub fn is_terminal(record: &Record) -> bool {
    matches!(record.record_type(), RecordType::A | RecordType::AAAA)
}

/// A/AAAA records of `records`, in order.
pub fn terminal_answers(records: &[Record]) -> Vec<Record> {
    records.iter().filter(|r| is_terminal(r)).cloned().collect()
}

/// Copies every A/AAAA record of `records` under the owner name `name`.
pub fn flatten_answers(records: &[Record], name: &Name) -> Vec<Record> {
    records
        .iter()
        .filter(|r| is_terminal(r))
        .map(|r| {
            let mut copied = r.clone();
            copied.set_name(name.clone());
            copied
        })
        .collect()
}
