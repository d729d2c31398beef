use petgraph::graph::{EdgeIndex, Graph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use std::collections::{HashMap, HashSet};

use crate::haplotype::haplotype::Haplotype;
use crate::reads::sam_record::SamRecord;

/**
 * A vertex of the read threading graph. The kmer payload is a borrowed view
 * into the reference slice or a read segment owned by the region worker, so
 * the graph must not outlive those buffers.
 */
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct DeBruijnVertex<'a> {
    pub kmer: &'a [u8],
}

impl<'a> DeBruijnVertex<'a> {
    pub fn new(kmer: &'a [u8]) -> DeBruijnVertex<'a> {
        DeBruijnVertex { kmer }
    }

    pub fn last_base(&self) -> u8 {
        self.kmer[self.kmer.len() - 1]
    }
}

/**
 * Simple edge class for connecting kmer vertices in the graph.
 */
#[derive(Clone, Debug)]
pub struct BaseEdge {
    multiplicity: usize,
    is_ref: bool,
    is_on_path: bool,
    score: f64,
}

impl BaseEdge {
    /**
     * Create a new BaseEdge with weight multiplicity and, if is_ref == true,
     * indicates a path through the reference.
     */
    pub fn new(is_ref: bool, multiplicity: usize) -> BaseEdge {
        BaseEdge {
            multiplicity,
            is_ref,
            is_on_path: false,
            score: 0.0,
        }
    }

    pub fn get_multiplicity(&self) -> usize {
        self.multiplicity
    }

    /**
     * Increase the multiplicity of this edge by incr
     */
    pub fn inc_multiplicity(&mut self, incr: usize) {
        self.multiplicity += incr
    }

    pub fn is_ref(&self) -> bool {
        self.is_ref
    }

    pub fn is_on_path(&self) -> bool {
        self.is_on_path
    }

    pub fn mark_on_path(&mut self) {
        self.is_on_path = true
    }

    pub fn get_score(&self) -> f64 {
        self.score
    }

    pub fn set_score(&mut self, score: f64) {
        self.score = score
    }
}

/**
 * Kmer de Bruijn graph over the reference slice and the high-quality
 * portions of the region's reads.
 *
 * The reference walk is threaded first and marks its edges; read segments
 * then thread along existing edges (incrementing multiplicities) and branch
 * off where they disagree. Duplicate kmers (appearing more than once within
 * a single sequence) never collapse to a single vertex.
 *
 * Pruning is represented as a predicate over edges rather than a second
 * physical graph: cycle detection and path enumeration only see kept edges.
 */
pub struct ReadThreadingGraph<'a> {
    kmer_size: usize,
    min_base_quality_to_use: u8,
    graph: Graph<DeBruijnVertex<'a>, BaseEdge>,
    unique_kmers: HashMap<&'a [u8], NodeIndex>,
    duplicate_kmers: HashSet<&'a [u8]>,
    reference_bases: Option<&'a [u8]>,
    read_segments: Vec<&'a [u8]>,
    ref_source: Option<NodeIndex>,
    ref_sink: Option<NodeIndex>,
}

impl<'a> ReadThreadingGraph<'a> {
    /// An edge needs this many observations to survive pruning unless it is a
    /// reference edge or its source has no alternative.
    pub const PRUNE_FACTOR: usize = 2;

    pub fn new(kmer_size: usize, min_base_quality_to_use: u8) -> ReadThreadingGraph<'a> {
        ReadThreadingGraph {
            kmer_size,
            min_base_quality_to_use,
            graph: Graph::new(),
            unique_kmers: HashMap::new(),
            duplicate_kmers: HashSet::new(),
            reference_bases: None,
            read_segments: Vec::new(),
            ref_source: None,
            ref_sink: None,
        }
    }

    pub fn get_kmer_size(&self) -> usize {
        self.kmer_size
    }

    pub fn unique_kmers_count(&self) -> usize {
        self.unique_kmers.len()
    }

    /**
     * Collect the kmers appearing more than once within the given sequence.
     */
    pub fn duplicate_kmers_of(sequence: &[u8], kmer_size: usize) -> HashSet<&[u8]> {
        let mut seen: HashSet<&[u8]> = HashSet::new();
        let mut duplicates: HashSet<&[u8]> = HashSet::new();
        if sequence.len() >= kmer_size {
            for kmer in sequence.windows(kmer_size) {
                if !seen.insert(kmer) {
                    duplicates.insert(kmer);
                }
            }
        }
        duplicates
    }

    pub fn set_reference(&mut self, reference: &'a [u8]) {
        self.reference_bases = Some(reference);
    }

    /**
     * Register a read's usable segments for threading: maximal runs of
     * non-N bases at or above the minimum base quality, at least one kmer long.
     */
    pub fn add_read(&mut self, read: &'a SamRecord) {
        let mut run_start: Option<usize> = None;
        for i in 0..=read.seq.len() {
            let usable = i < read.seq.len()
                && read.seq[i] != b'N'
                && read.qual[i] >= self.min_base_quality_to_use;
            match (usable, run_start) {
                (true, None) => run_start = Some(i),
                (false, Some(start)) => {
                    if i - start >= self.kmer_size {
                        self.read_segments.push(&read.seq[start..i]);
                    }
                    run_start = None;
                }
                _ => {}
            }
        }
    }

    /**
     * Build the graph from the registered reference and read segments.
     */
    pub fn build(&mut self) {
        let reference = self
            .reference_bases
            .expect("Reference must be set before building the graph");

        self.duplicate_kmers
            .extend(Self::duplicate_kmers_of(reference, self.kmer_size));
        let segments = self.read_segments.clone();
        for &segment in &segments {
            self.duplicate_kmers
                .extend(Self::duplicate_kmers_of(segment, self.kmer_size));
        }

        self.thread_reference(reference);
        for segment in segments {
            self.thread_segment(segment);
        }
    }

    fn get_or_create_vertex(&mut self, kmer: &'a [u8]) -> NodeIndex {
        if self.duplicate_kmers.contains(kmer) {
            // duplicate kmers never collapse to a single vertex
            return self.graph.add_node(DeBruijnVertex::new(kmer));
        }
        if let Some(&vertex) = self.unique_kmers.get(kmer) {
            return vertex;
        }
        let vertex = self.graph.add_node(DeBruijnVertex::new(kmer));
        self.unique_kmers.insert(kmer, vertex);
        vertex
    }

    fn thread_reference(&mut self, reference: &'a [u8]) {
        let mut previous: Option<NodeIndex> = None;
        for kmer in reference.windows(self.kmer_size) {
            let vertex = self.get_or_create_vertex(kmer);
            match previous {
                Some(previous_vertex) => {
                    self.graph
                        .add_edge(previous_vertex, vertex, BaseEdge::new(true, 1));
                }
                None => self.ref_source = Some(vertex),
            }
            previous = Some(vertex);
        }
        self.ref_sink = previous;
    }

    fn thread_segment(&mut self, segment: &'a [u8]) {
        let kmer_size = self.kmer_size;
        let first_kmer = &segment[0..kmer_size];
        let mut current = self.get_or_create_vertex(first_kmer);
        self.increment_counts_backwards(current, &segment[..kmer_size - 1]);

        for start in 1..=(segment.len() - kmer_size) {
            let kmer = &segment[start..start + kmer_size];
            let next_base = kmer[kmer_size - 1];

            let existing = self
                .graph
                .edges_directed(current, Direction::Outgoing)
                .find(|edge| self.graph[edge.target()].last_base() == next_base)
                .map(|edge| (edge.id(), edge.target()));

            current = match existing {
                Some((edge, target)) => {
                    self.graph[edge].inc_multiplicity(1);
                    target
                }
                None => {
                    let target = self.get_or_create_vertex(kmer);
                    self.graph.add_edge(current, target, BaseEdge::new(false, 1));
                    target
                }
            };
        }
    }

    /**
     * Attribute the evidence of a segment's first kmer to the shared prefix
     * chain it sits on: walk backwards through sole-incoming edges whose
     * source vertex ends with the expected base, incrementing each traversed
     * edge. Each hop consumes one base of the leading kmer, so attribution
     * stops after at most kmer_size - 1 hops.
     */
    fn increment_counts_backwards(&mut self, vertex: NodeIndex, kmer: &[u8]) {
        let mut current = vertex;
        let mut remaining = kmer;
        while !remaining.is_empty() {
            let sole_incoming = {
                let mut incoming = self.graph.edges_directed(current, Direction::Incoming);
                match (incoming.next(), incoming.next()) {
                    (Some(edge), None) => Some((edge.id(), edge.source())),
                    _ => None,
                }
            };
            let (edge, predecessor) = match sole_incoming {
                Some(found) => found,
                None => break,
            };
            if self.graph[predecessor].last_base() != remaining[remaining.len() - 1] {
                break;
            }
            self.graph[edge].inc_multiplicity(1);
            current = predecessor;
            remaining = &remaining[..remaining.len() - 1];
        }
    }

    /**
     * The pruning view: an edge is kept iff it is a reference edge, has been
     * observed at least PRUNE_FACTOR times, or is the only way out of its
     * source vertex.
     */
    fn is_kept(&self, edge: EdgeIndex) -> bool {
        let weight = &self.graph[edge];
        if weight.is_ref() || weight.get_multiplicity() >= Self::PRUNE_FACTOR {
            return true;
        }
        let (source, _) = self.graph.edge_endpoints(edge).unwrap();
        self.graph.edges_directed(source, Direction::Outgoing).count() == 1
    }

    /**
     * @return true if a cycle is reachable from the reference source in the pruned view
     */
    pub fn has_cycles(&self) -> bool {
        const GRAY: u8 = 1;
        const BLACK: u8 = 2;

        fn dfs(
            graph: &ReadThreadingGraph<'_>,
            vertex: NodeIndex,
            state: &mut HashMap<NodeIndex, u8>,
        ) -> bool {
            state.insert(vertex, GRAY);
            for edge in graph.graph.edges_directed(vertex, Direction::Outgoing) {
                if !graph.is_kept(edge.id()) {
                    continue;
                }
                match state.get(&edge.target()) {
                    Some(&GRAY) => return true,
                    Some(&BLACK) => {}
                    _ => {
                        if dfs(graph, edge.target(), state) {
                            return true;
                        }
                    }
                }
            }
            state.insert(vertex, BLACK);
            false
        }

        match self.ref_source {
            Some(source) => dfs(self, source, &mut HashMap::new()),
            None => false,
        }
    }

    /**
     * A graph is too simple to assemble when no source-to-sink path survives
     * pruning. Any graph carrying an intact reference walk passes.
     */
    pub fn is_low_complexity(&self) -> bool {
        let (source, sink) = match (self.ref_source, self.ref_sink) {
            (Some(source), Some(sink)) => (source, sink),
            _ => return true,
        };
        let mut reachable: HashSet<NodeIndex> = HashSet::new();
        let mut stack = vec![source];
        while let Some(vertex) = stack.pop() {
            if !reachable.insert(vertex) {
                continue;
            }
            if vertex == sink {
                return false;
            }
            for edge in self.graph.edges_directed(vertex, Direction::Outgoing) {
                if self.is_kept(edge.id()) {
                    stack.push(edge.target());
                }
            }
        }
        true
    }

    /**
     * Enumerate all source-to-sink paths in the pruned view and turn them into
     * scored haplotypes. A path's score is the sum of log10(count / total) over
     * its edges, where total sums the counts of the source vertex's on-path
     * outgoing edges, so the reference path is included and non-reference
     * paths score at most 0.
     */
    pub fn find_paths(&mut self) -> Vec<Haplotype> {
        let source = self.ref_source.expect("Graph has no reference source");
        let sink = self.ref_sink.expect("Graph has no reference sink");

        let mut paths: Vec<Vec<EdgeIndex>> = Vec::new();
        let mut stack: Vec<EdgeIndex> = Vec::new();
        let mut visited: HashSet<NodeIndex> = HashSet::new();
        visited.insert(source);
        self.path_dfs(source, sink, &mut visited, &mut stack, &mut paths);

        for path in &paths {
            for &edge in path {
                self.graph[edge].mark_on_path();
            }
        }

        // per-vertex totals over on-path outgoing edges
        let edges = self.graph.edge_indices().collect::<Vec<EdgeIndex>>();
        let mut outgoing_totals: HashMap<NodeIndex, usize> = HashMap::new();
        for &edge in &edges {
            if self.graph[edge].is_on_path() {
                let (source_vertex, _) = self.graph.edge_endpoints(edge).unwrap();
                *outgoing_totals.entry(source_vertex).or_insert(0) +=
                    self.graph[edge].get_multiplicity();
            }
        }
        for &edge in &edges {
            if self.graph[edge].is_on_path() {
                let (source_vertex, _) = self.graph.edge_endpoints(edge).unwrap();
                let total = outgoing_totals[&source_vertex];
                let score =
                    (self.graph[edge].get_multiplicity() as f64 / total as f64).log10();
                self.graph[edge].set_score(score);
            }
        }

        paths
            .iter()
            .map(|path| {
                let mut bases = self.graph[source].kmer.to_vec();
                let mut score = 0.0;
                for &edge in path {
                    let (_, target) = self.graph.edge_endpoints(edge).unwrap();
                    bases.push(self.graph[target].last_base());
                    score += self.graph[edge].get_score();
                }
                Haplotype::new(bases, score)
            })
            .collect()
    }

    fn path_dfs(
        &self,
        vertex: NodeIndex,
        sink: NodeIndex,
        visited: &mut HashSet<NodeIndex>,
        stack: &mut Vec<EdgeIndex>,
        paths: &mut Vec<Vec<EdgeIndex>>,
    ) {
        if vertex == sink {
            paths.push(stack.clone());
            return;
        }
        let outgoing = self
            .graph
            .edges_directed(vertex, Direction::Outgoing)
            .map(|edge| (edge.id(), edge.target()))
            .collect::<Vec<(EdgeIndex, NodeIndex)>>();
        for (edge, target) in outgoing {
            if !self.is_kept(edge) || visited.contains(&target) {
                continue;
            }
            visited.insert(target);
            stack.push(edge);
            self.path_dfs(target, sink, visited, stack, paths);
            stack.pop();
            visited.remove(&target);
        }
    }
}
