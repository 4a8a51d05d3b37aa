//! Second pass: per-document vector norms.
//!
//! For every term, `idf = log2(N / df)`; every posting adds `sqrt(weight * idf)` to its
//! document's running sum, and the document's norm is the square root of that sum. The pass
//! only reads the vocabulary and postings and overwrites the norm fields, so running it
//! again reproduces the same values.

use std::{collections::HashMap, fs::File, io::BufReader};

use tracing::info;

use crate::{
    IndexError,
    documents::{read_documents, write_norms},
    location::IndexFiles,
    vocabulary::{read_run, read_vocabulary},
};

/// Inverse document frequency of a term.
pub fn idf(total_documents: u64, document_frequency: u64) -> f64 {
    (total_documents as f64 / document_frequency as f64).log2()
}

/// Computes every document's vector norm and writes it into the documents file.
///
/// Returns the norms in documents-file order. Documents without postings keep 0.0.
pub fn backfill_norms(files: &IndexFiles) -> Result<Vec<f64>, IndexError> {
    let documents = read_documents(&files.documents)?;
    let total = documents.len() as u64;
    let slots: HashMap<u64, usize> = documents
        .iter()
        .enumerate()
        .map(|(slot, (offset, _))| (*offset, slot))
        .collect();
    let mut sums = vec![0.0_f64; documents.len()];

    let vocabulary = read_vocabulary(&files.vocabulary)?;
    let mut postings = BufReader::new(File::open(&files.postings)?);
    let mut expected_offset = 0_u64;

    for (term, entry) in &vocabulary {
        if entry.postings_offset != expected_offset {
            return Err(IndexError::corrupt(
                &files.vocabulary,
                entry.postings_offset,
                format!("run for {term} does not follow the previous run"),
            ));
        }
        if entry.document_frequency == 0 || entry.document_frequency > total {
            return Err(IndexError::corrupt(
                &files.vocabulary,
                entry.postings_offset,
                format!(
                    "term {term} has document frequency {} in a collection of {total}",
                    entry.document_frequency
                ),
            ));
        }
        let term_idf = idf(total, entry.document_frequency);

        read_run(&mut postings, &files.postings, entry, |posting| {
            let Some(&slot) = slots.get(&posting.document_pointer) else {
                return Err(IndexError::corrupt(
                    &files.postings,
                    entry.postings_offset,
                    format!("posting for {} has a dangling pointer", posting.document_id),
                ));
            };
            sums[slot] += (posting.weight * term_idf).sqrt();
            Ok(())
        })?;
        expected_offset = entry.postings_offset.wrapping_add(entry.postings_len);
    }

    let norms: Vec<f64> = sums.into_iter().map(f64::sqrt).collect();
    write_norms(&files.documents, &norms)?;
    info!(documents = total, terms = vocabulary.len(), "backfilled vector norms");
    Ok(norms)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn idf_values() {
        assert_eq!(idf(2, 2), 0.0);
        assert_eq!(idf(2, 1), 1.0);
        assert_eq!(idf(8, 1), 3.0);
    }

    #[test]
    fn idf_decreases_with_document_frequency() {
        let total = 1000;
        let mut previous = f64::INFINITY;
        for df in [1, 2, 10, 100, 500, 1000] {
            let value = idf(total, df);
            assert!(value < previous, "idf({df}) = {value} not below {previous}");
            previous = value;
        }
    }
}
