use std::ops::Range;

use crate::error::{RangecrackError, RangecrackResult};

/// A contiguous part of the search space handled by a single worker request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Chunk {
    /// The position of the chunk, starting at 0.
    pub number: usize,
    /// The counters of the chunk.
    pub range: Range<u64>,
}

impl Chunk {
    /// The first counter of the chunk.
    pub fn start_index(&self) -> u64 {
        self.range.start
    }

    /// The last counter of the chunk (inclusive), or `None` if the chunk is empty.
    pub fn end_index(&self) -> Option<u64> {
        (!self.range.is_empty()).then(|| self.range.end - 1)
    }

    pub fn len(&self) -> u64 {
        self.range.end - self.range.start
    }

    pub fn is_empty(&self) -> bool {
        self.range.is_empty()
    }
}

/// An iterator that splits a search space into near-equal chunks.
#[derive(Clone)]
pub struct ChunkIterator {
    range_start: u64,
    chunk_size: u64,
    remainder: u64,
    chunk_number: usize,
    chunks: usize,
}

impl ChunkIterator {
    /// Creates a new chunk iterator where `total` is the size of the search space.
    pub fn new(total: u64, chunks: usize) -> RangecrackResult<ChunkIterator> {
        if chunks == 0 {
            return Err(RangecrackError::NoChunks);
        }

        Ok(ChunkIterator {
            range_start: 0,
            chunk_size: total / chunks as u64,
            remainder: total % chunks as u64,
            chunk_number: 0,
            chunks,
        })
    }
}

impl Iterator for ChunkIterator {
    type Item = Chunk;

    fn next(&mut self) -> Option<Self::Item> {
        if self.chunk_number == self.chunks {
            return None;
        }

        // the first `remainder` chunks get one more counter
        let chunk_size = if (self.chunk_number as u64) < self.remainder {
            self.chunk_size + 1
        } else {
            self.chunk_size
        };

        let range_end = self.range_start + chunk_size;
        let chunk = Chunk {
            number: self.chunk_number,
            range: self.range_start..range_end,
        };
        self.range_start = range_end;
        self.chunk_number += 1;

        Some(chunk)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (
            self.chunks - self.chunk_number,
            Some(self.chunks - self.chunk_number),
        )
    }
}

impl ExactSizeIterator for ChunkIterator {}

/// Splits `total` counters into `chunks` contiguous chunks.
pub fn partition(total: u64, chunks: usize) -> RangecrackResult<Vec<Chunk>> {
    Ok(ChunkIterator::new(total, chunks)?.collect())
}

#[cfg(test)]
mod tests {
    use itertools::Itertools;

    use crate::{
        error::RangecrackError,
        scheduling::{partition, ChunkIterator},
    };

    fn assert_partition(total: u64, chunks: usize) {
        let partition = partition(total, chunks).unwrap();
        let base = total / chunks as u64;

        assert_eq!(chunks, partition.len());
        assert_eq!(0, partition.first().unwrap().range.start);
        assert_eq!(total, partition.last().unwrap().range.end);
        assert_eq!(total, partition.iter().map(|chunk| chunk.len()).sum::<u64>());

        for (a, b) in partition.iter().tuple_windows() {
            // no gap and no overlap
            assert_eq!(a.range.end, b.range.start);
            assert!(a.len() >= b.len());
        }

        for chunk in &partition {
            assert!(chunk.len() == base || chunk.len() == base + 1);
        }
    }

    #[test]
    fn test_partition_properties() {
        for (total, chunks) in [(702, 4), (702, 1), (702, 702), (18_278, 7), (10, 3), (3, 5)] {
            assert_partition(total, chunks);
        }
    }

    #[test]
    fn test_partition_702_in_4() {
        let ranges = partition(702, 4)
            .unwrap()
            .into_iter()
            .map(|chunk| (chunk.start_index(), chunk.end_index().unwrap()))
            .collect_vec();

        assert_eq!(vec![(0, 175), (176, 351), (352, 526), (527, 701)], ranges);
    }

    #[test]
    fn test_more_chunks_than_counters() {
        let chunks = partition(2, 4).unwrap();

        assert_eq!(Some(0), chunks[0].end_index());
        assert_eq!(Some(1), chunks[1].end_index());
        assert!(chunks[2].is_empty());
        assert_eq!(None, chunks[3].end_index());
    }

    #[test]
    fn test_chunk_iterator_len() {
        let mut iter = ChunkIterator::new(100, 3).unwrap();
        assert_eq!(3, iter.len());

        iter.next();
        assert_eq!(2, iter.len());
        assert_eq!(2, iter.count());
    }

    #[test]
    fn test_no_chunks() {
        assert_eq!(Err(RangecrackError::NoChunks), partition(702, 0));
    }
}
