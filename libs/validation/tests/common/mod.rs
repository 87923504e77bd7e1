//! Shared record factory for validation tests
//!
//! Records go through the real builder and parser so tests exercise the same
//! types an archive reader would produce. Every record gets the next
//! signature counter and a matching log time, which makes creation order the
//! canonical archive order.

#![allow(dead_code)]

use ttc_codec::{parse_log_message, LogMessageBuilder};
use ttc_types::{InMemoryArchive, LogMessage, LogTime, OperationType};

pub const SERIAL_A: &[u8] = b"HelloWorld";
pub const SERIAL_B: &[u8] = b"SecondTSE";

const BASE_TIME: i64 = 1_600_000_000;

#[derive(Debug)]
pub struct RecordFactory {
    next_counter: u64,
}

impl Default for RecordFactory {
    fn default() -> Self {
        Self { next_counter: 1 }
    }
}

impl RecordFactory {
    pub fn new() -> Self {
        Self::default()
    }

    fn finish(&mut self, builder: LogMessageBuilder) -> LogMessage {
        let counter = self.next_counter;
        self.next_counter += 1;
        let builder = builder
            .signature_counter(counter)
            .log_time(LogTime::UnixTime(BASE_TIME + counter as i64));
        parse_log_message(&builder.build(), &builder.file_name()).expect("built record parses")
    }

    pub fn transaction(&mut self, serial: &[u8], op: OperationType, number: u64) -> LogMessage {
        self.finish(LogMessageBuilder::transaction(op, number).serial_number(serial.to_vec()))
    }

    pub fn start(&mut self, serial: &[u8], number: u64) -> LogMessage {
        self.transaction(serial, OperationType::Start, number)
    }

    pub fn update(&mut self, serial: &[u8], number: u64) -> LogMessage {
        self.transaction(serial, OperationType::Update, number)
    }

    pub fn finish_tx(&mut self, serial: &[u8], number: u64) -> LogMessage {
        self.transaction(serial, OperationType::Finish, number)
    }

    pub fn system(&mut self, serial: &[u8]) -> LogMessage {
        self.finish(LogMessageBuilder::system("UpdateTime").serial_number(serial.to_vec()))
    }

    pub fn audit(&mut self, serial: &[u8]) -> LogMessage {
        self.finish(
            LogMessageBuilder::audit()
                .serial_number(serial.to_vec())
                .se_audit_data(vec![0x30, 0x00]),
        )
    }
}

pub fn archive(messages: Vec<LogMessage>) -> InMemoryArchive {
    InMemoryArchive::from_messages(messages)
}
