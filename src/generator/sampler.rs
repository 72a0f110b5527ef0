// src/generator/sampler.rs

use rand::Rng;

use crate::error::AppError;

/// Draws up to `n` entries from `pool` uniformly, without replacement.
///
/// Works on an index array so the caller's slice is never reordered or
/// shrunk and can be reused by the next generator.
pub fn draw_without_replacement<'a, T, R: Rng + ?Sized>(
    rng: &mut R,
    pool: &'a [T],
    n: usize,
) -> Vec<&'a T> {
    let mut remaining: Vec<usize> = (0..pool.len()).collect();
    let mut drawn = Vec::with_capacity(n.min(pool.len()));

    while drawn.len() < n && !remaining.is_empty() {
        let pick = rng.gen_range(0..remaining.len());
        drawn.push(&pool[remaining.swap_remove(pick)]);
    }

    drawn
}

/// Picks `count` distractors for the entry keyed `correct_key`.
///
/// Entries sharing the correct key are never returned, and no two returned
/// entries share a key. Fails when the pool cannot supply `count` distinct
/// keys besides the correct one, duplicates included.
pub fn sample_without_replacement<'a, T, R, K>(
    rng: &mut R,
    pool: &'a [T],
    key: K,
    correct_key: &str,
    count: usize,
) -> Result<Vec<&'a T>, AppError>
where
    R: Rng + ?Sized,
    K: Fn(&T) -> &str,
{
    if count + 1 > pool.len() {
        return Err(AppError::PoolExhausted(format!(
            "need {} distractors for '{}' but the pool holds {} entries",
            count,
            correct_key,
            pool.len()
        )));
    }

    let mut remaining: Vec<usize> = (0..pool.len())
        .filter(|&i| key(&pool[i]) != correct_key)
        .collect();
    let mut picked: Vec<&'a T> = Vec::with_capacity(count);

    while picked.len() < count && !remaining.is_empty() {
        let candidate = &pool[remaining.swap_remove(rng.gen_range(0..remaining.len()))];
        if picked.iter().any(|p| key(*p) == key(candidate)) {
            continue;
        }
        picked.push(candidate);
    }

    if picked.len() < count {
        return Err(AppError::PoolExhausted(format!(
            "need {} distractors for '{}' but the pool holds only {} distinct others",
            count,
            correct_key,
            picked.len()
        )));
    }

    Ok(picked)
}
