use serde::{Deserialize, Serialize};

/// 矩形边界框 - 用于表示R-tree中的最小边界矩形(MBR)
///
/// 坐标为整数，构造后满足 min[d] <= max[d] 的不变量（逐维度）。
/// 矩形一经构造不可变；MBR与矩形结构相同，语义上表示一组子几何体的紧致包围盒。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rectangle {
    pub min: [i32; 2],  // [x_min, y_min]
    pub max: [i32; 2],  // [x_max, y_max]
}

impl Rectangle {
    /// 空MBR哨兵值：倒置的最宽区间
    ///
    /// 作为union运算的单位元使用：从EMPTY出发逐个并入成员矩形，
    /// 即可单调地累积出紧致包围盒（union满足结合律和交换律，累积顺序无关）。
    pub const EMPTY: Rectangle = Rectangle {
        min: [i32::MAX, i32::MAX],
        max: [i32::MIN, i32::MIN],
    };

    /// 创建新的矩形
    pub fn new(x_min: i32, y_min: i32, x_max: i32, y_max: i32) -> Self {
        assert!(x_min <= x_max && y_min <= y_max, "Invalid rectangle bounds");
        Rectangle {
            min: [x_min, y_min],
            max: [x_max, y_max],
        }
    }

    /// 从两个无序角点构造矩形（逐坐标归一化为min/max）
    ///
    /// 原始输入中两个角点的顺序不作要求，读入时在这里归一化。
    pub fn from_corners((x1, y1): (i32, i32), (x2, y2): (i32, i32)) -> Self {
        Rectangle {
            min: [x1.min(x2), y1.min(y2)],
            max: [x1.max(x2), y1.max(y2)],
        }
    }

    /// 计算两个矩形的并集MBR（逐坐标取min/max，全函数，无失败路径）
    pub fn union(&self, other: &Rectangle) -> Rectangle {
        Rectangle {
            min: [
                self.min[0].min(other.min[0]),
                self.min[1].min(other.min[1]),
            ],
            max: [
                self.max[0].max(other.max[0]),
                self.max[1].max(other.max[1]),
            ],
        }
    }

    /// 原地并入另一个矩形，扩大当前MBR
    pub fn expand(&mut self, other: &Rectangle) {
        *self = self.union(other);
    }

    /// 判断两个矩形是否相交
    ///
    /// 闭区间语义：边相触也算相交（非严格不等式）。
    pub fn intersects(&self, other: &Rectangle) -> bool {
        self.min[0] <= other.max[0] && self.max[0] >= other.min[0] &&
        self.min[1] <= other.max[1] && self.max[1] >= other.min[1]
    }

    /// 矩形中心点x坐标（i64中间量避免求和溢出，整除向零截断）
    pub fn center_x(&self) -> i32 {
        ((self.min[0] as i64 + self.max[0] as i64) / 2) as i32
    }

    /// 矩形中心点y坐标
    pub fn center_y(&self) -> i32 {
        ((self.min[1] as i64 + self.max[1] as i64) / 2) as i32
    }

    /// 计算矩形中心点
    pub fn center(&self) -> [i32; 2] {
        [self.center_x(), self.center_y()]
    }

    /// 判断矩形是否为点（宽度和高度都为0）
    pub fn is_point(&self) -> bool {
        self.min[0] == self.max[0] && self.min[1] == self.max[1]
    }
}
