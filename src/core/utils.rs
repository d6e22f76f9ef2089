/// 分配下一个请求 id（从 1 开始，回绕时跳过 0）
pub fn next_id(counter: &mut u64) -> u64 {
    let id = *counter;
    *counter = counter.wrapping_add(1).max(1);
    id
}
