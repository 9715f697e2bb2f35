use core::{borrow::Borrow, hash::Hash};
use hashbrown::{hash_map::Entry, HashMap};
use num_traits::{CheckedAdd, CheckedSub, One, Zero};

/// A map of counted values. Entries whose count dropped to zero are "weak" and only removed by [`RcHashMap::drain_weak`].
#[derive(Debug)]
pub(crate) struct RcHashMap<K, C, V>(HashMap<K, (C, V)>)
where
	K: Hash + Eq,
	C: CheckedAdd + CheckedSub + One + Zero;
impl<K, C, V> Default for RcHashMap<K, C, V>
where
	K: Hash + Eq,
	C: CheckedAdd + CheckedSub + One + Zero,
{
	fn default() -> Self {
		Self::new()
	}
}
impl<K, C, V> RcHashMap<K, C, V>
where
	K: Hash + Eq,
	C: CheckedAdd + CheckedSub + One + Zero,
{
	#[must_use]
	pub fn new() -> Self {
		Self(HashMap::new())
	}

	/// Increments the count of `k`, or inserts the result of `v` with a count of one.
	///
	/// `v` only runs if `k` is absent. Its error is returned as-is.
	pub fn increment_or_try_insert_with<E, F>(&mut self, k: K, v: F) -> Result<&mut V, E>
	where
		F: FnOnce() -> Result<V, E>,
		E: From<CountSaturatedError>,
	{
		match self.0.entry(k) {
			Entry::Occupied(occupied) => {
				let (c, v) = occupied.into_mut();
				*c = c.checked_add(&C::one()).ok_or(CountSaturatedError)?;
				Ok(v)
			}
			Entry::Vacant(vacant) => {
				let (_, v) = vacant.insert((C::one(), v()?));
				Ok(v)
			}
		}
	}

	pub fn weak_decrement<Q: ?Sized>(&mut self, k: &Q) -> Result<Option<&mut V>, CountSaturatedError>
	where
		K: Borrow<Q>,
		Q: Eq + Hash,
	{
		match self.0.get_mut(k) {
			Some((c, v)) => {
				*c = c.checked_sub(&C::one()).ok_or(CountSaturatedError)?;
				Ok(Some(v))
			}
			None => Ok(None),
		}
	}

	/// Removes and returns all entries with a count of zero.
	pub fn drain_weak(&mut self) -> Vec<(K, V)> {
		self.0.drain_filter(|_, (c, _)| c.is_zero()).map(|(k, (_, v))| (k, v)).collect()
	}

	#[cfg(test)]
	pub fn count<Q: ?Sized>(&self, k: &Q) -> Option<&C>
	where
		K: Borrow<Q>,
		Q: Eq + Hash,
	{
		self.0.get(k).map(|(c, _)| c)
	}

	#[cfg(test)]
	pub fn len(&self) -> usize {
		self.0.len()
	}

	#[cfg(test)]
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}

/// A count would over- or underflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct CountSaturatedError;
