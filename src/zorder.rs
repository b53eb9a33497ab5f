//! Z-order（Morton码）重排序
//!
//! 在搜索阶段开始前，把查询矩形序列按其中心点的Morton码排序，
//! 使空间上相邻的查询在内存访问上也相邻，提升树遍历的缓存局部性。
//! 这是一个纯排序，不是空间划分：输出永远是输入的一个置换。

use crate::rectangle::Rectangle;

/// 把低16位比特展开到32位的偶数位上（标准mask-shift级联）
fn spread_low16(v: u32) -> u32 {
    let mut x = v & 0x0000_ffff;
    x = (x ^ (x << 8)) & 0x00ff_00ff;
    x = (x ^ (x << 4)) & 0x0f0f_0f0f;
    x = (x ^ (x << 2)) & 0x3333_3333;
    x = (x ^ (x << 1)) & 0x5555_5555;
    x
}

/// 计算矩形中心点的Morton码（Z值）
///
/// 中心点按整除（向零截断）计算，且先取中心值再交错比特，
/// 负坐标按补码位型取低16位，全坐标范围内不会溢出。
/// y坐标的展开左移一位后与x坐标的展开按位或，得到32位交错码。
pub fn morton_code(rect: &Rectangle) -> u32 {
    let [cx, cy] = rect.center();
    (spread_low16(cy as u32) << 1) | spread_low16(cx as u32)
}

/// 按中心点Morton码对矩形序列原地排序
///
/// 码为有限的32位整数，比较器是全序；不保证稳定性（码相同的
/// 矩形之间相对顺序不作承诺）。排序后序列是输入的一个置换，
/// Morton码单调非降。
pub fn zorder_sort(rects: &mut [Rectangle]) {
    rects.sort_by_cached_key(morton_code);
}
