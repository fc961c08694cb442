//! Bucketed transposition table keyed by Zobrist hash.
//!
//! Each bucket holds a small fixed number of entries. Entries remember the
//! search horizon (`max_depth`) they were computed under; an entry is only
//! trusted for a cutoff by a search running with the same horizon, which also
//! keeps forced-line entries apart from ordinary ones.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TTFlag {
    Exact,
    UpperBound,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TTEntry {
    pub hash: u64,
    /// Remaining depth at the node when stored.
    pub depth: u32,
    pub max_depth: u32,
    pub score: i32,
    /// Position of the best move in that node's (ordered) move list.
    pub best_index: usize,
    pub flag: TTFlag,
}

impl TTEntry {
    /// Whether this entry may replace searching the node outright.
    #[inline]
    pub fn usable_for_cutoff(&self, max_depth: u32, remaining: u32, beta: i32, move_count: usize) -> bool {
        let exact = self.flag == TTFlag::Exact;
        self.max_depth == max_depth
            && (self.depth >= remaining || exact)
            && (exact || self.score >= beta)
            && self.best_index < move_count
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TTStats {
    pub probes: u64,
    pub hits: u64,
    pub stores: u64,
}

#[derive(Debug, Clone)]
pub struct TranspositionTable {
    buckets: Vec<Vec<TTEntry>>,
    bucket_capacity: usize,
    stats: TTStats,
}

impl TranspositionTable {
    pub fn new(bucket_count: usize, bucket_capacity: usize) -> Self {
        let bucket_capacity = bucket_capacity.max(1);
        Self {
            buckets: vec![Vec::with_capacity(bucket_capacity); bucket_count.max(1)],
            bucket_capacity,
            stats: TTStats::default(),
        }
    }

    pub fn clear(&mut self) {
        for bucket in &mut self.buckets {
            bucket.clear();
        }
        self.stats = TTStats::default();
    }

    #[inline]
    pub fn stats(&self) -> TTStats {
        self.stats
    }

    pub fn len(&self) -> usize {
        self.buckets.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.iter().all(Vec::is_empty)
    }

    #[inline]
    fn bucket_index(&self, hash: u64) -> usize {
        (hash % self.buckets.len() as u64) as usize
    }

    pub fn lookup(&mut self, hash: u64) -> Option<TTEntry> {
        self.stats.probes += 1;
        let idx = self.bucket_index(hash);
        let hit = self.buckets[idx].iter().find(|entry| entry.hash == hash).copied();
        if hit.is_some() {
            self.stats.hits += 1;
        }
        hit
    }

    pub fn insert(&mut self, entry: TTEntry) {
        self.stats.stores += 1;
        let capacity = self.bucket_capacity;
        let idx = self.bucket_index(entry.hash);
        let bucket = &mut self.buckets[idx];

        if let Some(existing) = bucket.iter_mut().find(|e| e.hash == entry.hash) {
            let keep_existing = existing.max_depth == entry.max_depth
                && (entry.depth <= existing.depth || existing.flag == TTFlag::Exact);
            if !keep_existing {
                *existing = entry;
            }
            return;
        }

        if bucket.len() < capacity {
            bucket.push(entry);
            return;
        }

        let victim = bucket
            .iter()
            .position(|e| e.max_depth != entry.max_depth)
            .or_else(|| {
                bucket
                    .iter()
                    .enumerate()
                    .min_by_key(|(_, e)| e.depth)
                    .map(|(i, _)| i)
            });
        if let Some(i) = victim {
            bucket[i] = entry;
        }
    }
}
