use serde::{Deserialize, Serialize};

/// A value that is either a single scalar or one value per element.
///
/// Scale outputs use this so that scaling a scalar input produces a scalar
/// output without allocating a vector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScalarOrArray<T: Sync + Clone> {
    Scalar(T),
    Array(Vec<T>),
}

impl<T: Sync + Clone> ScalarOrArray<T> {
    pub fn as_iter(&self, scalar_len: usize) -> Box<dyn Iterator<Item = &T> + '_> {
        match self {
            ScalarOrArray::Scalar(value) => Box::new(std::iter::repeat(value).take(scalar_len)),
            ScalarOrArray::Array(values) => Box::new(values.iter()),
        }
    }

    pub fn as_vec(&self, scalar_len: usize) -> Vec<T> {
        self.as_iter(scalar_len).cloned().collect::<Vec<_>>()
    }

    pub fn map<U: Sync + Clone>(&self, f: impl Fn(&T) -> U) -> ScalarOrArray<U> {
        match self {
            ScalarOrArray::Scalar(value) => ScalarOrArray::Scalar(f(value)),
            ScalarOrArray::Array(values) => ScalarOrArray::Array(values.iter().map(f).collect()),
        }
    }
}

impl<T: Sync + Clone> From<Vec<T>> for ScalarOrArray<T> {
    fn from(values: Vec<T>) -> Self {
        ScalarOrArray::Array(values)
    }
}

impl<T: Sync + Clone> From<T> for ScalarOrArray<T> {
    fn from(value: T) -> Self {
        ScalarOrArray::Scalar(value)
    }
}

/// Borrowed counterpart of [`ScalarOrArray`] used for scale inputs.
#[derive(Debug, Clone)]
pub enum ScalarOrArrayRef<'a, T: Sync + Clone> {
    Scalar(T),
    Array(&'a [T]),
}

impl<'a, T: Sync + Clone> ScalarOrArrayRef<'a, T> {
    pub fn to_owned(self) -> ScalarOrArray<T> {
        match self {
            ScalarOrArrayRef::Scalar(value) => ScalarOrArray::Scalar(value.clone()),
            ScalarOrArrayRef::Array(values) => ScalarOrArray::Array(values.to_vec()),
        }
    }

    pub fn map<U: Sync + Clone>(self, f: impl Fn(&T) -> U) -> ScalarOrArray<U> {
        match self {
            ScalarOrArrayRef::Scalar(value) => ScalarOrArray::Scalar(f(&value)),
            ScalarOrArrayRef::Array(values) => ScalarOrArray::Array(values.iter().map(f).collect()),
        }
    }
}

impl<'a, T: Sync + Clone> From<&'a [T]> for ScalarOrArrayRef<'a, T> {
    fn from(values: &'a [T]) -> Self {
        ScalarOrArrayRef::Array(values)
    }
}

impl<'a, T: Sync + Clone> From<&'a Vec<T>> for ScalarOrArrayRef<'a, T> {
    fn from(values: &'a Vec<T>) -> Self {
        ScalarOrArrayRef::Array(values.as_slice())
    }
}

impl<'a, T: Sync + Clone> From<&'a T> for ScalarOrArrayRef<'a, T> {
    fn from(value: &'a T) -> Self {
        ScalarOrArrayRef::Scalar(value.clone())
    }
}

impl<'a, T: Sync + Clone> From<T> for ScalarOrArrayRef<'a, T> {
    fn from(value: T) -> Self {
        ScalarOrArrayRef::Scalar(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_repeats_to_length() {
        let v: ScalarOrArray<f32> = 2.5.into();
        assert_eq!(v.as_vec(3), vec![2.5, 2.5, 2.5]);
    }

    #[test]
    fn test_map_preserves_shape() {
        let v: ScalarOrArray<f32> = vec![1.0, 2.0, 3.0].into();
        let doubled = v.map(|x| x * 2.0);
        assert_eq!(doubled, ScalarOrArray::Array(vec![2.0, 4.0, 6.0]));

        let s: ScalarOrArray<f32> = 1.0.into();
        assert_eq!(s.map(|x| x + 1.0), ScalarOrArray::Scalar(2.0));
    }
}
