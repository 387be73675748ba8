/*
 * File: /src/util.rs
 * Created Date: Tuesday, June 18th 2024
 * Author: Zihan
 * -----
 * Last Modified: Saturday, 17th October 2026
 * Modified By: Zihan Wu <wzh4464@gmail.com>
 * -----
 * HISTORY:
 * Date      		By   	Comments
 * ----------		------	---------------------------------------------------------
 * 2026-10-17		Zihan	argmax / cosine helpers for NBVD labeling
**/
use std::cmp::Ordering;
use std::collections::HashMap;

use ndarray::{Array2, ArrayView1, ArrayView2, Axis};

/// 检查两个分类结果是否等价 (equal up to a relabeling)
pub fn are_equivalent_classifications(a: &[usize], b: &[usize]) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut a_to_b_map = HashMap::new();
    let mut b_to_a_map = HashMap::new();

    for (&a_class, &b_class) in a.iter().zip(b.iter()) {
        let a_mapped = a_to_b_map.entry(a_class).or_insert(b_class);
        let b_mapped = b_to_a_map.entry(b_class).or_insert(a_class);

        if a_mapped != &b_class || b_mapped != &a_class {
            return false;
        }
    }

    true
}

/// Index of the maximum entry of every row. First index wins on ties.
pub fn argmax_rows(a: ArrayView2<f64>) -> Vec<usize> {
    a.axis_iter(Axis(0))
        .map(|row| {
            row.iter()
                .enumerate()
                .fold(None, |best: Option<(usize, f64)>, (idx, &v)| match best {
                    Some((_, bv)) if v.partial_cmp(&bv) != Some(Ordering::Greater) => best,
                    _ => Some((idx, v)),
                })
                .map(|(idx, _)| idx)
                .unwrap_or(0)
        })
        .collect()
}

/// Copy of `a` with every row scaled to unit L2 norm. Zero rows stay zero.
pub fn normalize_rows(a: ArrayView2<f64>) -> Array2<f64> {
    let mut out = a.to_owned();
    for mut row in out.axis_iter_mut(Axis(0)) {
        let norm = row.dot(&row).sqrt();
        if norm > 0.0 {
            row.mapv_inplace(|v| v / norm);
        }
    }
    out
}

/// Pairwise cosine distances between the rows of `a` and the rows of `b`,
/// clipped to [0, 2]. A zero vector has similarity 0 with everything.
pub fn cosine_distances(a: ArrayView2<f64>, b: ArrayView2<f64>) -> Array2<f64> {
    let an = normalize_rows(a);
    let bn = normalize_rows(b);
    an.dot(&bn.t()).mapv(|sim| (1.0 - sim).clamp(0.0, 2.0))
}

pub fn cosine_distance(a: ArrayView1<f64>, b: ArrayView1<f64>) -> f64 {
    let na = a.dot(&a).sqrt();
    let nb = b.dot(&b).sqrt();
    if na == 0.0 || nb == 0.0 {
        return 1.0;
    }
    (1.0 - a.dot(&b) / (na * nb)).clamp(0.0, 2.0)
}
