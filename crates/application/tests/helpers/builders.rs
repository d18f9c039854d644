#![allow(dead_code)]
use hickory_proto::op::{Message, MessageType, OpCode, Query};
use hickory_proto::rr::rdata::{A, AAAA, CNAME, MX};
use hickory_proto::rr::{Name, RData, Record, RecordType};
use std::net::{Ipv4Addr, Ipv6Addr};
use std::str::FromStr;

pub fn name(s: &str) -> Name {
    Name::from_str(s).unwrap()
}

pub fn cname(owner: &str, target: &str) -> Record {
    Record::from_rdata(name(owner), 300, RData::CNAME(CNAME(name(target))))
}

pub fn a(owner: &str, ip: &str) -> Record {
    let ip: Ipv4Addr = ip.parse().unwrap();
    Record::from_rdata(name(owner), 60, RData::A(A(ip)))
}

pub fn aaaa(owner: &str, ip: &str) -> Record {
    let ip: Ipv6Addr = ip.parse().unwrap();
    Record::from_rdata(name(owner), 60, RData::AAAA(AAAA(ip)))
}

pub fn mx(owner: &str, exchange: &str) -> Record {
    Record::from_rdata(name(owner), 60, RData::MX(MX::new(10, name(exchange))))
}

pub fn query(qname: &str, qtype: RecordType) -> Message {
    let mut message = Message::new();
    message.set_id(0x4242);
    message.set_message_type(MessageType::Query);
    message.set_op_code(OpCode::Query);
    message.set_recursion_desired(true);
    message.add_query(Query::query(name(qname), qtype));
    message
}

pub fn response(qname: &str, qtype: RecordType, answers: Vec<Record>) -> Message {
    let mut message = query(qname, qtype);
    message.set_message_type(MessageType::Response);
    message.insert_answers(answers);
    message
}
