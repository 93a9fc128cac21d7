use crate::error::BioResult;
use crate::seq::dna::ReverseComplement;
use crate::seq::traits::SeqBytes;
use std::ops::Index;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SeqBatch<S: SeqBytes> {
    seqs: Vec<S>,
}

impl<S: SeqBytes> SeqBatch<S> {
    pub fn new(seqs: Vec<S>) -> Self {
        Self { seqs }
    }

    pub fn from_vec(seqs: Vec<S>) -> Self {
        Self { seqs }
    }

    pub fn as_slice(&self) -> &[S] {
        &self.seqs
    }

    pub fn into_vec(self) -> Vec<S> {
        self.seqs
    }

    pub fn len(&self) -> usize {
        self.seqs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seqs.is_empty()
    }

    pub fn get(&self, i: usize) -> Option<&S> {
        self.seqs.get(i)
    }

    pub fn iter(&self) -> impl Iterator<Item = &S> {
        self.seqs.iter()
    }

    pub fn push(&mut self, s: S) {
        self.seqs.push(s);
    }

    pub fn extend<I>(&mut self, iter: I)
    where
        I: IntoIterator<Item = S>,
    {
        self.seqs.extend(iter);
    }

    pub fn clear(&mut self) {
        self.seqs.clear();
    }

    pub fn reserve(&mut self, additional: usize) {
        self.seqs.reserve(additional);
    }

    pub fn pop(&mut self) -> Option<S> {
        self.seqs.pop()
    }

    pub fn truncate(&mut self, len: usize) {
        self.seqs.truncate(len);
    }

    pub fn lengths(&self) -> Vec<usize> {
        self.seqs.iter().map(|seq| seq.as_bytes().len()).collect()
    }

    pub fn to_bytes_vec(&self) -> Vec<Vec<u8>> {
        self.seqs
            .iter()
            .map(|seq| seq.as_bytes().to_vec())
            .collect()
    }

    pub fn map_bytes<F>(&self, f: F) -> BioResult<Self>
    where
        F: Fn(&[u8]) -> Vec<u8>,
    {
        let mut out = Vec::with_capacity(self.seqs.len());
        for seq in &self.seqs {
            let bytes = f(seq.as_bytes());
            out.push(S::from_bytes(bytes)?);
        }
        Ok(Self { seqs: out })
    }

    pub fn map_bytes_in_place<F>(&mut self, f: F) -> BioResult<()>
    where
        F: Fn(&[u8]) -> Vec<u8>,
    {
        let mut out = Vec::with_capacity(self.seqs.len());
        for seq in &self.seqs {
            let bytes = f(seq.as_bytes());
            out.push(S::from_bytes(bytes)?);
        }
        self.seqs = out;
        Ok(())
    }
}

impl<S: SeqBytes> Index<usize> for SeqBatch<S> {
    type Output = S;

    fn index(&self, index: usize) -> &Self::Output {
        &self.seqs[index]
    }
}

impl<S> SeqBatch<S>
where
    S: SeqBytes + ReverseComplement,
{
    pub fn reverse_complements(&self) -> Self {
        let out = self
            .seqs
            .iter()
            .map(|seq| seq.reverse_complement())
            .collect();
        Self { seqs: out }
    }

    pub fn reverse_complements_in_place(&mut self) {
        for seq in &mut self.seqs {
            *seq = seq.reverse_complement();
        }
    }
}
