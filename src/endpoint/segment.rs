use crate::buffer::SequenceBuffer;
use crate::frame::{Command, SegmentHeader};

/// One unit of the ARQ protocol: wire header fields, payload, and the sender's retransmission
/// bookkeeping.
///
/// A segment is owned by exactly one of the connection's queues at a time and is moved, never
/// copied, between them. Dropping it returns its payload storage to the buffer pool.
#[derive(Debug)]
pub struct Segment {
    pub conv: u32,
    pub cmd: Command,
    pub frg: u8,
    pub wnd: u16,
    pub ts: u32,
    pub sn: u32,
    pub una: u32,

    // Local only, never encoded
    pub rto: u32,
    pub xmit: u32,
    pub resendts: u32,
    pub fastack: u32,
    pub acked: bool,

    pub data: SequenceBuffer,
}

impl Segment {
    /// An outgoing data segment. Sequence fields are assigned when it enters the send window.
    pub fn with_payload(payload: &[u8], frg: u8) -> Self {
        let mut data = SequenceBuffer::pooled(payload.len());
        data.write_bytes(payload);

        Self {
            conv: 0,
            cmd: Command::Push,
            frg,
            wnd: 0,
            ts: 0,
            sn: 0,
            una: 0,
            rto: 0,
            xmit: 0,
            resendts: 0,
            fastack: 0,
            acked: false,
            data,
        }
    }

    /// A segment rebuilt from a received record.
    pub fn received(header: &SegmentHeader, payload: &[u8]) -> Self {
        let mut seg = Self::with_payload(payload, header.frg);
        seg.conv = header.conv;
        seg.cmd = header.cmd;
        seg.wnd = header.wnd;
        seg.ts = header.ts;
        seg.sn = header.sn;
        seg.una = header.una;
        seg
    }

    pub fn len(&self) -> usize {
        self.data.readable_bytes()
    }

    pub fn payload(&self) -> &[u8] {
        self.data.readable()
    }

    pub fn header(&self) -> SegmentHeader {
        SegmentHeader {
            conv: self.conv,
            cmd: self.cmd,
            frg: self.frg,
            wnd: self.wnd,
            ts: self.ts,
            sn: self.sn,
            una: self.una,
            len: self.len() as u32,
        }
    }
}
