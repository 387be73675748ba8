/*
 * File: /src/Submatrix.rs
 * Created Date: Monday January 22nd 2024
 * Author: Zihan
 * -----
 * Last Modified: Saturday, 17th October 2026
 * Modified By: the developer formerly known as Zihan at <wzh4464@gmail.com>
 * -----
 * HISTORY:
 * Date      		By   	Comments
 * ----------		------	---------------------------------------------------------
 * 2026-10-17		Zihan	Co-cluster blocks of an NBVD model
**/

// Extend the usage of slice for ndarray
// struct Submatrix and impl
use ndarray::{Array2, ArrayView2};
use std::ops::Index;

///
/// # Example
/// ```
/// use nbvd_cocluster::submatrix::Submatrix;
/// use ndarray::Array2;
/// let a = Array2::from_shape_vec((3, 3), vec![1, 2, 3, 4, 5, 6, 7, 8, 9]).unwrap();
/// let b = Submatrix::from_indices(&a, &[0, 2], &[1, 2]).unwrap();
///
/// assert_eq!(b[(1, 1)], 9);
/// assert_eq!(b[(0, 0)], 2);
/// ```
/// b = [[2, 3],
///     [8, 9]]
#[derive(Debug, Clone)]
pub struct Submatrix<'a, T> {
    data: ArrayView2<'a, T>,
    pub row_indices: Vec<usize>,
    pub col_indices: Vec<usize>,
}

impl<'a, T> Submatrix<'a, T> {
    fn new(matrix: &'a Array2<T>, row_indices: Vec<usize>, col_indices: Vec<usize>) -> Option<Self> {
        // reject empty or out-of-range index sets
        let rm = row_indices.iter().max()?;
        let cm = col_indices.iter().max()?;

        if *rm >= matrix.nrows() || *cm >= matrix.ncols() {
            None
        } else {
            Some(Submatrix {
                data: matrix.view(),
                row_indices,
                col_indices,
            })
        }
    }

    // give `new` a nick name: from_indices to pub
    pub fn from_indices(matrix: &'a Array2<T>, row_indices: &[usize], col_indices: &[usize]) -> Option<Self> {
        Self::new(matrix, row_indices.to_vec(), col_indices.to_vec())
    }

    pub fn get(&self, row: usize, col: usize) -> Option<&T> {
        self.row_indices.get(row).and_then(|&r| {
            self.col_indices
                .get(col)
                .and_then(|&c| self.data.get((r, c)))
        })
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.row_indices.len(), self.col_indices.len())
    }
}

impl<'a, T: Clone> Submatrix<'a, T> {
    /// Dense copy of the block
    pub fn to_array(&self) -> Array2<T> {
        Array2::from_shape_fn(self.shape(), |(i, j)| {
            self.data[(self.row_indices[i], self.col_indices[j])].clone()
        })
    }
}

impl<'a> Submatrix<'a, f64> {
    pub fn mean(&self) -> f64 {
        let (rows, cols) = self.shape();
        let total: f64 = self
            .row_indices
            .iter()
            .flat_map(|&r| self.col_indices.iter().map(move |&c| (r, c)))
            .map(|idx| self.data[idx])
            .sum();
        total / (rows * cols) as f64
    }
}

impl<'a, T> Index<(usize, usize)> for Submatrix<'a, T> {
    type Output = T;

    fn index(&self, index: (usize, usize)) -> &Self::Output {
        match self.get(index.0, index.1) {
            Some(v) => v,
            None => panic!("Submatrix index {:?} out of bounds for shape {:?}", index, self.shape()),
        }
    }
}

// impl Display
/// # Example
/// ```log
/// [2, 3]
/// [8, 9]
/// ```
impl<'a, T> std::fmt::Display for Submatrix<'a, T>
where
    T: std::fmt::Display,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for i in 0..self.row_indices.len() {
            let row: Vec<String> = (0..self.col_indices.len())
                .map(|j| format!("{}", self[(i, j)]))
                .collect();
            writeln!(f, "[{}]", row.join(", "))?;
        }
        Ok(())
    }
}
