//! Fair time-shared execution model, which recalculates all completion times
//! at each activity creation and completion.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

struct Activity<T> {
    remaining_volume: f64,
    id: u64,
    item: T,
}

impl<T> Activity<T> {
    fn new(remaining_volume: f64, id: u64, item: T) -> Self {
        Self {
            remaining_volume,
            id,
            item,
        }
    }
}

impl<T> PartialOrd for Activity<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Activity<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .remaining_volume
            .total_cmp(&self.remaining_volume)
            .then(other.id.cmp(&self.id))
    }
}

impl<T> PartialEq for Activity<T> {
    fn eq(&self, other: &Self) -> bool {
        self.remaining_volume == other.remaining_volume && self.id == other.id
    }
}

impl<T> Eq for Activity<T> {}

/// Models a resource with fixed throughput shared equally between concurrent
/// activities.
///
/// While `k` activities are running, each one progresses at `throughput / k`.
/// Completions are staggered: when an activity finishes, its share is
/// redistributed among the remaining ones. Total work is conserved, and the
/// computation is a deterministic closed form over the inserted activities.
pub struct FairShareModel<T> {
    throughput: f64,
    entries: BinaryHeap<Activity<T>>,
    next_id: u64,
    last_throughput_per_item: f64,
    last_recalculation_time: f64,
}

impl<T> FairShareModel<T> {
    /// Creates a model with the given fixed throughput.
    pub fn new(throughput: f64) -> Self {
        Self {
            throughput,
            entries: BinaryHeap::new(),
            next_id: 0,
            last_throughput_per_item: 0.,
            last_recalculation_time: 0.,
        }
    }

    fn recalculate(&mut self, current_time: f64, throughput_per_item: f64) {
        let mut new_entries = BinaryHeap::<Activity<T>>::with_capacity(self.entries.len());
        let processed_volume = (current_time - self.last_recalculation_time) * self.last_throughput_per_item;
        while let Some(entry) = self.entries.pop() {
            let remaining_volume = entry.remaining_volume - processed_volume;
            new_entries.push(Activity::<T>::new(remaining_volume, entry.id, entry.item));
        }
        self.entries = new_entries;
        self.last_throughput_per_item = throughput_per_item;
        self.last_recalculation_time = current_time;
    }

    /// Adds a new activity with the given volume of work at `current_time`.
    pub fn insert(&mut self, current_time: f64, volume: f64, item: T) {
        let new_count = self.entries.len() + 1;
        self.recalculate(current_time, self.throughput / new_count as f64);
        let next_id = self.next_id;
        self.entries.push(Activity::<T>::new(volume, next_id, item));
        self.next_id += 1;
    }

    /// Removes the next completed activity from the model and returns its
    /// completion time along with the activity item.
    pub fn pop(&mut self) -> Option<(f64, T)> {
        if let Some(entry) = self.entries.pop() {
            let complete_time = self.last_recalculation_time + entry.remaining_volume / self.last_throughput_per_item;
            if self.entries.is_empty() {
                self.last_recalculation_time = complete_time;
                self.last_throughput_per_item = 0.;
            } else {
                let new_count = self.entries.len();
                self.recalculate(complete_time, self.throughput / new_count as f64);
            }
            return Some((complete_time, entry.item));
        }
        None
    }

    /// Returns the next completion time and activity item without removing it.
    pub fn peek(&self) -> Option<(f64, &T)> {
        self.entries.peek().map(|entry| {
            (
                self.last_recalculation_time + entry.remaining_volume / self.last_throughput_per_item,
                &entry.item,
            )
        })
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::FairShareModel;

    fn assert_float_eq(x: f64, y: f64, eps: f64) {
        assert!(
            (x - y).abs() < eps || (x.max(y) - x.min(y)) / x.min(y) < eps,
            "Values do not match: {:.15} vs {:.15}",
            x,
            y
        );
    }

    fn pop_all(model: &mut FairShareModel<u32>) -> Vec<(f64, u32)> {
        let mut result = vec![];
        while let Some((time, item)) = model.pop() {
            result.push((time, item));
        }
        result
    }

    #[test]
    fn single_activity() {
        let mut model = FairShareModel::new(100.);
        model.insert(0., 350., 0);
        assert_eq!(model.peek(), Some((3.5, &0)));
        assert_eq!(pop_all(&mut model), vec![(3.5, 0)]);
        assert!(model.is_empty());
    }

    #[test]
    fn two_activities_with_simultaneous_start() {
        let mut model = FairShareModel::new(100.);
        model.insert(0., 150., 0);
        model.insert(0., 300., 1);
        // Both progress at 50 until the first finishes at 3, then the second
        // takes the full throughput and finishes at 3 + 150 / 100 = 4.5.
        assert_eq!(pop_all(&mut model), vec![(3., 0), (4.5, 1)]);
    }

    #[test]
    fn equal_volumes_finish_together_in_insertion_order() {
        let mut model = FairShareModel::new(1000.);
        model.insert(0., 10000., 0);
        model.insert(0., 10000., 2);
        model.insert(0., 10000., 4);
        let result = pop_all(&mut model);
        assert_eq!(result.len(), 3);
        for (i, item) in [0u32, 2, 4].iter().enumerate() {
            assert_float_eq(result[i].0, 30., 1e-12);
            assert_eq!(result[i].1, *item);
        }
    }

    #[test]
    fn late_arrival_shares_remaining_capacity() {
        let mut model = FairShareModel::new(100.);
        model.insert(0., 200., 0);
        model.insert(1., 200., 1);
        // First runs alone for 1s (100 done), then both share 50 each.
        // First finishes at 1 + 100 / 50 = 3, second at 3 + 100 / 100 = 4.
        let result = pop_all(&mut model);
        assert_float_eq(result[0].0, 3., 1e-12);
        assert_eq!(result[0].1, 0);
        assert_float_eq(result[1].0, 4., 1e-12);
        assert_eq!(result[1].1, 1);
    }

    #[test]
    fn work_is_conserved() {
        let volumes = [250., 500., 750., 1000.];
        let throughput = 100.;
        let mut model = FairShareModel::new(throughput);
        for (i, volume) in volumes.iter().enumerate() {
            model.insert(0., *volume, i as u32);
        }
        let result = pop_all(&mut model);
        let makespan = result.last().unwrap().0;
        let total_volume: f64 = volumes.iter().sum();
        assert_float_eq(makespan, total_volume / throughput, 1e-12);
    }
}
