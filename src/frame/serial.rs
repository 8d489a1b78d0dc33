use super::*;

pub struct Reader<'a> {
    buffer: &'a [u8],
    bytes_read: usize,
}

// Callers check the remaining length up front (see `BlockSerial::SIZE`), so these index directly
impl<'a> Reader<'a> {
    pub fn new(buffer: &'a [u8]) -> Self {
        Self {
            buffer,
            bytes_read: 0,
        }
    }

    pub fn bytes_read(&self) -> usize {
        self.bytes_read
    }

    fn take<const N: usize>(&mut self) -> [u8; N] {
        let mut bytes = [0; N];
        bytes.copy_from_slice(&self.buffer[self.bytes_read..self.bytes_read + N]);
        self.bytes_read += N;
        bytes
    }

    pub fn read_u8(&mut self) -> u8 {
        u8::from_le_bytes(self.take())
    }

    pub fn read_u16(&mut self) -> u16 {
        u16::from_le_bytes(self.take())
    }

    pub fn read_u32(&mut self) -> u32 {
        u32::from_le_bytes(self.take())
    }
}

pub struct Writer<'a> {
    buffer: &'a mut [u8],
    bytes_written: usize,
}

impl<'a> Writer<'a> {
    pub fn new(buffer: &'a mut [u8]) -> Self {
        Self {
            buffer,
            bytes_written: 0,
        }
    }

    pub fn bytes_written(&self) -> usize {
        self.bytes_written
    }

    fn put(&mut self, bytes: &[u8]) {
        let end = self.bytes_written + bytes.len();
        self.buffer[self.bytes_written..end].copy_from_slice(bytes);
        self.bytes_written = end;
    }

    pub fn write_u8(&mut self, value: u8) {
        self.put(&value.to_le_bytes());
    }

    pub fn write_u16(&mut self, value: u16) {
        self.put(&value.to_le_bytes());
    }

    pub fn write_u32(&mut self, value: u32) {
        self.put(&value.to_le_bytes());
    }

    pub fn write_slice(&mut self, bytes: &[u8]) {
        self.put(bytes);
    }
}

pub trait BlockSerial {
    const SIZE: usize;

    fn read(rd: &mut Reader) -> Result<Self>
    where
        Self: Sized;

    fn write(wr: &mut Writer, obj: &Self);
}

pub trait Serial {
    fn read(buffer: &[u8]) -> Result<(Self, usize)>
    where
        Self: Sized;

    fn write(buffer: &mut [u8], obj: &Self) -> Option<usize>;
}

impl<T> Serial for T
where
    T: BlockSerial,
{
    fn read(buffer: &[u8]) -> Result<(Self, usize)> {
        if buffer.len() < T::SIZE {
            return Err(Error::TruncatedHeader {
                remaining: buffer.len(),
            });
        }

        let rd = &mut Reader::new(buffer);

        let obj = T::read(rd)?;

        debug_assert_eq!(rd.bytes_read(), T::SIZE);

        Ok((obj, rd.bytes_read()))
    }

    fn write(buffer: &mut [u8], obj: &Self) -> Option<usize> {
        if buffer.len() < T::SIZE {
            return None;
        }

        let mut wr = Writer::new(buffer);

        T::write(&mut wr, obj);

        debug_assert_eq!(wr.bytes_written(), T::SIZE);

        Some(wr.bytes_written())
    }
}

impl BlockSerial for SegmentHeader {
    const SIZE: usize = OVERHEAD;

    fn read(rd: &mut Reader) -> Result<Self> {
        let conv = rd.read_u32();
        let cmd = rd.read_u8();
        let frg = rd.read_u8();
        let wnd = rd.read_u16();
        let ts = rd.read_u32();
        let sn = rd.read_u32();
        let una = rd.read_u32();
        let len = rd.read_u32();

        Ok(Self {
            conv,
            cmd: Command::try_from(cmd)?,
            frg,
            wnd,
            ts,
            sn,
            una,
            len,
        })
    }

    fn write(wr: &mut Writer, obj: &Self) {
        wr.write_u32(obj.conv);
        wr.write_u8(obj.cmd.to_u8());
        wr.write_u8(obj.frg);
        wr.write_u16(obj.wnd);
        wr.write_u32(obj.ts);
        wr.write_u32(obj.sn);
        wr.write_u32(obj.una);
        wr.write_u32(obj.len);
    }
}

/// Walks the segments packed into one received frame.
///
/// Iteration ends after the first error; records yielded before it are valid.
pub struct SegmentReader<'a> {
    buffer: &'a [u8],
    read_idx: usize,
    conv: u32,
}

impl<'a> SegmentReader<'a> {
    pub fn new(buffer: &'a [u8], conv: u32) -> Self {
        Self {
            buffer,
            read_idx: 0,
            conv,
        }
    }

    pub fn remaining_bytes(&self) -> &'a [u8] {
        &self.buffer[self.read_idx..]
    }

    fn read_segment(&mut self) -> Result<(SegmentHeader, &'a [u8])> {
        let src = self.remaining_bytes();

        if src.len() < OVERHEAD {
            return Err(Error::TruncatedHeader {
                remaining: src.len(),
            });
        }

        if let Some(conv) = peek_conv(src) {
            if conv != self.conv {
                return Err(Error::ConvMismatch {
                    expected: self.conv,
                    actual: conv,
                });
            }
        }

        let (header, header_size) = <SegmentHeader as Serial>::read(src)?;

        let payload_len = header.len as usize;
        let remaining = src.len() - header_size;

        if remaining < payload_len {
            return Err(Error::TruncatedPayload {
                needed: payload_len,
                remaining,
            });
        }

        self.read_idx += header_size + payload_len;

        Ok((header, &src[header_size..header_size + payload_len]))
    }
}

impl<'a> Iterator for SegmentReader<'a> {
    type Item = Result<(SegmentHeader, &'a [u8])>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.read_idx >= self.buffer.len() {
            return None;
        }

        let result = self.read_segment();

        if result.is_err() {
            // Nothing after a malformed record can be trusted
            self.read_idx = self.buffer.len();
        }

        Some(result)
    }
}

/// Accumulates encoded segments into an mtu-sized frame.
///
/// The first `reserved` bytes of every frame are left untouched for the transport's own header.
pub struct FrameWriter {
    buffer: Box<[u8]>,
    write_idx: usize,
    reserved: usize,
}

impl FrameWriter {
    pub fn new(frame_size: usize, reserved: usize) -> Self {
        debug_assert!(reserved + OVERHEAD <= frame_size);

        Self {
            buffer: vec![0; frame_size].into_boxed_slice(),
            write_idx: reserved,
            reserved,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.write_idx == self.reserved
    }

    /// Whether `size` more bytes fit in the current frame.
    pub fn fits(&self, size: usize) -> bool {
        self.write_idx + size <= self.buffer.len()
    }

    pub fn write_header(&mut self, header: &SegmentHeader) {
        let begin_idx = self.write_idx;

        match <SegmentHeader as Serial>::write(&mut self.buffer[begin_idx..], header) {
            Some(size) => self.write_idx += size,
            None => debug_assert!(false, "frame overflow; check fits() first"),
        }
    }

    pub fn write_slice(&mut self, bytes: &[u8]) {
        let mut wr = Writer::new(&mut self.buffer[self.write_idx..]);
        wr.write_slice(bytes);
        self.write_idx += wr.bytes_written();
    }

    /// The frame assembled so far, reserved prefix included.
    pub fn frame(&self) -> &[u8] {
        &self.buffer[..self.write_idx]
    }

    /// Starts a new frame.
    pub fn reset(&mut self) {
        self.write_idx = self.reserved;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(cmd: Command, sn: u32, len: u32) -> SegmentHeader {
        SegmentHeader {
            conv: 0x1122_3344,
            cmd,
            frg: 3,
            wnd: 0xABCD,
            ts: 0xDEAD_BEEF,
            sn,
            una: 0x0102_0304,
            len,
        }
    }

    #[test]
    fn header_layout() {
        let mut buf = [0; OVERHEAD];
        let hdr = header(Command::Ack, 0x0A0B_0C0D, 7);

        assert_eq!(<SegmentHeader as Serial>::write(&mut buf, &hdr), Some(OVERHEAD));
        assert_eq!(
            buf,
            [
                0x44, 0x33, 0x22, 0x11, 82, 3, 0xCD, 0xAB, 0xEF, 0xBE, 0xAD, 0xDE, 0x0D, 0x0C, 0x0B,
                0x0A, 0x04, 0x03, 0x02, 0x01, 7, 0, 0, 0
            ]
        );

        let (decoded, size) = <SegmentHeader as Serial>::read(&buf).unwrap();
        assert_eq!(size, OVERHEAD);
        assert_eq!(decoded, hdr);
    }

    #[test]
    fn header_into_short_buffer() {
        let mut buf = [0; OVERHEAD - 1];
        let hdr = header(Command::Push, 0, 0);

        assert_eq!(<SegmentHeader as Serial>::write(&mut buf, &hdr), None);
        assert_eq!(
            <SegmentHeader as Serial>::read(&buf),
            Err(Error::TruncatedHeader {
                remaining: OVERHEAD - 1
            })
        );
    }

    fn encode(records: &[(SegmentHeader, &[u8])]) -> Vec<u8> {
        let mut writer = FrameWriter::new(4096, 0);
        for (hdr, payload) in records {
            writer.write_header(hdr);
            writer.write_slice(payload);
        }
        writer.frame().to_vec()
    }

    #[test]
    fn reader_walks_records() {
        let frame = encode(&[
            (header(Command::Push, 1, 3), &[1, 2, 3]),
            (header(Command::Ack, 2, 0), &[]),
            (header(Command::Push, 3, 1), &[9]),
        ]);

        let records = SegmentReader::new(&frame, 0x1122_3344)
            .collect::<Result<Vec<_>>>()
            .unwrap();

        assert_eq!(records.len(), 3);
        assert_eq!(records[0].0.sn, 1);
        assert_eq!(records[0].1, &[1, 2, 3]);
        assert_eq!(records[1].0.cmd, Command::Ack);
        assert_eq!(records[1].1, &[] as &[u8]);
        assert_eq!(records[2].1, &[9]);
    }

    #[test]
    fn reader_stops_at_faults() {
        let good = encode(&[(header(Command::Push, 1, 2), &[1, 2])]);

        // Truncated payload
        let mut frame = good.clone();
        frame.extend_from_slice(&encode(&[(header(Command::Push, 2, 4), &[1, 2, 3, 4])]));
        frame.truncate(frame.len() - 1);
        let results = SegmentReader::new(&frame, 0x1122_3344).collect::<Vec<_>>();
        assert_eq!(results.len(), 2);
        assert!(results[0].is_ok());
        assert_eq!(
            results[1],
            Err(Error::TruncatedPayload {
                needed: 4,
                remaining: 3
            })
        );

        // Trailing partial header
        let mut frame = good.clone();
        frame.extend_from_slice(&[0; 10]);
        let results = SegmentReader::new(&frame, 0x1122_3344).collect::<Vec<_>>();
        assert_eq!(results[1], Err(Error::TruncatedHeader { remaining: 10 }));

        // Unknown command, and nothing after it is read
        let mut frame = good.clone();
        let mut bad = encode(&[(header(Command::Push, 2, 0), &[])]);
        bad[4] = 99;
        frame.extend_from_slice(&bad);
        frame.extend_from_slice(&good);
        let results = SegmentReader::new(&frame, 0x1122_3344).collect::<Vec<_>>();
        assert_eq!(results.len(), 2);
        assert_eq!(results[1], Err(Error::BadCommand(99)));

        // Foreign conversation
        let results = SegmentReader::new(&good, 7).collect::<Vec<_>>();
        assert_eq!(
            results,
            vec![Err(Error::ConvMismatch {
                expected: 7,
                actual: 0x1122_3344
            })]
        );
    }

    #[test]
    fn frame_writer_respects_reserved_prefix() {
        let mut writer = FrameWriter::new(64, 4);
        assert!(writer.is_empty());
        assert!(writer.fits(60));
        assert!(!writer.fits(61));

        writer.write_header(&header(Command::WindowAsk, 0, 0));
        assert!(!writer.is_empty());
        assert_eq!(writer.frame().len(), 4 + OVERHEAD);
        assert!(writer.fits(36));
        assert!(!writer.fits(37));

        writer.reset();
        assert!(writer.is_empty());
        assert_eq!(writer.frame().len(), 4);
    }
}
