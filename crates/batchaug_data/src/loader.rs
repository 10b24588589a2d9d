//! Fixed-size batching and epoch iteration.

use burn::prelude::*;
use ndarray::s;

use batchaug_core::{ImageBatch, ImageTensorBatch, RandomSource, Seed, SeededSource};

use crate::error::{DataError, Result};

/// Split `data` into `floor(N / batch_size)` batches of exactly `batch_size`
/// examples, in order.
///
/// The trailing `N % batch_size` examples are dropped. Each batch is an owned
/// copy, so the result can be iterated any number of times.
///
/// # Errors
///
/// Returns [`DataError::InvalidBatchSize`] if `batch_size` is zero.
///
/// # Example
///
/// ```rust
/// use batchaug_core::{DataFormat, ImageBatch};
/// use batchaug_data::make_batches;
/// use ndarray::{Array2, Array4};
///
/// let data = ImageBatch::new(
///     Array2::<f32>::zeros((10, 2)),
///     Array4::<f32>::zeros((10, 1, 4, 4)),
///     DataFormat::Nchw,
/// )
/// .unwrap();
/// let batches = make_batches(3, &data).unwrap();
/// assert_eq!(batches.len(), 3);
/// assert!(batches.iter().all(|b| b.batch_size() == 3));
/// ```
pub fn make_batches(batch_size: usize, data: &ImageBatch) -> Result<Vec<ImageBatch>> {
    if batch_size == 0 {
        return Err(DataError::InvalidBatchSize(
            "Batch size must be greater than 0".to_string(),
        ));
    }

    let n_batches = data.batch_size() / batch_size;
    let mut batches = Vec::with_capacity(n_batches);
    for b in 0..n_batches {
        let (start, end) = (b * batch_size, (b + 1) * batch_size);
        batches.push(ImageBatch::new(
            data.labels().slice(s![start..end, ..]).to_owned(),
            data.images().slice(s![start..end, .., .., ..]).to_owned(),
            data.format(),
        )?);
    }

    tracing::debug!(
        examples = data.batch_size(),
        batch_size,
        n_batches,
        dropped = data.batch_size() - n_batches * batch_size,
        "made batches"
    );
    Ok(batches)
}

/// A dataloader that yields fixed-size batches of an in-memory image set.
///
/// Each epoch optionally reshuffles the examples with a seeded source that
/// keeps advancing across epochs, then cuts the set with [`make_batches`].
///
/// # Example
///
/// ```rust,ignore
/// use batchaug_data::ImageDataLoader;
/// use batchaug_core::Seed;
///
/// let mut loader = ImageDataLoader::builder(data)
///     .batch_size(128)
///     .shuffle(true)
///     .seed(Seed::new(42))
///     .build()?;
///
/// for batch in loader.epoch()? {
///     // augment and train
/// }
/// ```
pub struct ImageDataLoader {
    data: ImageBatch,
    batch_size: usize,
    shuffle: bool,
    source: SeededSource,
}

impl ImageDataLoader {
    /// Create a new dataloader builder.
    #[must_use]
    pub fn builder(data: ImageBatch) -> ImageDataLoaderBuilder {
        ImageDataLoaderBuilder::new(data)
    }

    /// Get the underlying examples.
    #[must_use]
    pub fn data(&self) -> &ImageBatch {
        &self.data
    }

    /// Get the batch size.
    #[must_use]
    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Number of full batches per epoch.
    #[must_use]
    pub fn n_batches(&self) -> usize {
        self.data.batch_size() / self.batch_size
    }

    /// Get the total number of examples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.batch_size()
    }

    /// Check if the loader is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Produce the batches of the next epoch.
    ///
    /// # Errors
    ///
    /// Propagates batching errors.
    pub fn epoch(&mut self) -> Result<Vec<ImageBatch>> {
        if !self.shuffle {
            return make_batches(self.batch_size, &self.data);
        }

        let order = self.source.permutation(self.data.batch_size());
        let shuffled = self.data.select(&order)?;
        make_batches(self.batch_size, &shuffled)
    }

    /// Produce the next epoch as Burn tensor batches on `device`.
    ///
    /// # Type Parameters
    ///
    /// * `B` - The Burn backend to use for tensors
    pub fn tensor_epoch<B: Backend>(&mut self, device: &B::Device) -> Result<Vec<ImageTensorBatch<B>>> {
        Ok(self
            .epoch()?
            .iter()
            .map(|batch| ImageTensorBatch::from_image_batch(batch, device))
            .collect())
    }
}

/// Builder for ImageDataLoader.
pub struct ImageDataLoaderBuilder {
    data: ImageBatch,
    batch_size: usize,
    shuffle: bool,
    seed: Option<Seed>,
}

impl ImageDataLoaderBuilder {
    /// Create a new builder.
    #[must_use]
    pub fn new(data: ImageBatch) -> Self {
        Self {
            data,
            batch_size: 32,
            shuffle: false,
            seed: None,
        }
    }

    /// Set the batch size.
    #[must_use]
    pub fn batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    /// Enable or disable shuffling.
    #[must_use]
    pub fn shuffle(mut self, shuffle: bool) -> Self {
        self.shuffle = shuffle;
        self
    }

    /// Set the random seed for shuffling.
    #[must_use]
    pub fn seed(mut self, seed: Seed) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Build the dataloader.
    ///
    /// # Errors
    ///
    /// Returns an error if the batch size is zero or the data is empty.
    pub fn build(self) -> Result<ImageDataLoader> {
        if self.batch_size == 0 {
            return Err(DataError::InvalidBatchSize(
                "Batch size must be greater than 0".to_string(),
            ));
        }

        if self.data.is_empty() {
            return Err(DataError::EmptyDataset);
        }

        let source = match self.seed {
            Some(seed) => SeededSource::new(seed),
            None => SeededSource::from_entropy(),
        };

        Ok(ImageDataLoader {
            data: self.data,
            batch_size: self.batch_size,
            shuffle: self.shuffle,
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use batchaug_core::DataFormat;
    use ndarray::{Array2, Array4};

    /// `n` examples whose label and pixels all carry the example index.
    fn indexed(n: usize) -> ImageBatch {
        let labels = Array2::from_shape_fn((n, 1), |(i, _)| i as f32);
        let images = Array4::from_shape_fn((n, 2, 3, 3), |(i, _, _, _)| i as f32);
        ImageBatch::new(labels, images, DataFormat::Nchw).unwrap()
    }

    #[test]
    fn test_make_batches_drops_remainder() {
        let data = indexed(10);
        let batches = make_batches(4, &data).unwrap();

        assert_eq!(batches.len(), 2);
        for (b, batch) in batches.iter().enumerate() {
            assert_eq!(batch.batch_size(), 4);
            assert_eq!(batch.format(), DataFormat::Nchw);
            for i in 0..4 {
                let expected = (b * 4 + i) as f32;
                assert_eq!(batch.labels()[[i, 0]], expected);
                assert_eq!(batch.images()[[i, 1, 2, 2]], expected);
            }
        }
    }

    #[test]
    fn test_make_batches_edge_sizes() {
        let data = indexed(6);
        assert_eq!(make_batches(6, &data).unwrap().len(), 1);
        assert_eq!(make_batches(1, &data).unwrap().len(), 6);
        assert!(make_batches(7, &data).unwrap().is_empty());
        assert!(matches!(make_batches(0, &data), Err(DataError::InvalidBatchSize(_))));
    }

    #[test]
    fn test_builder_validation() {
        assert!(ImageDataLoader::builder(indexed(4)).batch_size(0).build().is_err());
        assert!(matches!(
            ImageDataLoader::builder(indexed(0)).build(),
            Err(DataError::EmptyDataset)
        ));
    }

    #[test]
    fn test_unshuffled_epochs_repeat() {
        let mut loader = ImageDataLoader::builder(indexed(9)).batch_size(3).build().unwrap();
        assert_eq!(loader.n_batches(), 3);
        assert_eq!(loader.batch_size(), 3);
        assert_eq!(loader.len(), loader.data().batch_size());
        let first = loader.epoch().unwrap();
        let second = loader.epoch().unwrap();
        assert_eq!(first, second);
        assert_eq!(first[2].labels()[[0, 0]], 6.0);
    }

    #[test]
    fn test_shuffled_epochs_cover_data_and_advance() {
        let mut loader = ImageDataLoader::builder(indexed(64))
            .batch_size(8)
            .shuffle(true)
            .seed(Seed::new(42))
            .build()
            .unwrap();

        let first = loader.epoch().unwrap();
        let mut seen: Vec<usize> = first
            .iter()
            .flat_map(|b| b.labels().column(0).to_vec())
            .map(|v| v as usize)
            .collect();
        seen.sort_unstable();
        assert_eq!(seen, (0..64).collect::<Vec<_>>());

        let second = loader.epoch().unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_tensor_epoch() {
        use batchaug_core::backend::NdArray;

        let mut loader = ImageDataLoader::builder(indexed(5)).batch_size(2).build().unwrap();
        let batches = loader.tensor_epoch::<NdArray>(&Default::default()).unwrap();
        assert_eq!(batches.len(), 2);
        assert_eq!(batches[1].images.dims(), [2, 2, 3, 3]);
    }
}
