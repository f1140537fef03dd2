#[cfg(test)]
use mockall::mock;
use rust_htslib::bam::Record;

pub const FLAG_UNMAPPED: u16 = 0x4;
pub const FLAG_SECONDARY: u16 = 0x100;

pub trait AlignedRead {
    fn name(&self) -> &[u8];
    fn flags(&self) -> u16;
    fn mapq(&self) -> u8;
    fn tid(&self) -> i32;
    fn pos(&self) -> i64;
    // Exclusive, computed from the CIGAR
    fn endpos(&self) -> i64;

    #[inline]
    fn is_unmapped(&self) -> bool {
        self.flags() & FLAG_UNMAPPED != 0
    }

    #[inline]
    fn is_secondary(&self) -> bool {
        self.flags() & FLAG_SECONDARY != 0
    }
}

/// Batch slots own one record each for the whole run; records are reset in place instead of being reallocated.
pub trait Recycle {
    fn blank() -> Self;
    fn recycle(&mut self);
}

#[cfg(test)]
mock! {
    pub Read {}
    impl AlignedRead for Read {
        fn name(&self) -> &[u8];
        fn flags(&self) -> u16;
        fn mapq(&self) -> u8;
        fn tid(&self) -> i32;
        fn pos(&self) -> i64;
        fn endpos(&self) -> i64;
        fn is_unmapped(&self) -> bool;
        fn is_secondary(&self) -> bool;
    }
}

impl AlignedRead for Record {
    #[inline]
    fn name(&self) -> &[u8] {
        self.qname()
    }

    #[inline]
    fn flags(&self) -> u16 {
        self.flags()
    }

    #[inline]
    fn mapq(&self) -> u8 {
        self.mapq()
    }

    #[inline]
    fn tid(&self) -> i32 {
        self.tid()
    }

    #[inline]
    fn pos(&self) -> i64 {
        self.pos()
    }

    #[inline]
    fn endpos(&self) -> i64 {
        self.cigar().end_pos()
    }
}

impl Recycle for Record {
    fn blank() -> Self {
        Record::new()
    }

    fn recycle(&mut self) {
        *self = Record::new();
    }
}
